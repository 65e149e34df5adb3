use super::spatial_grid::SpatialGrid;
use super::spiral::PointGenerator;
use super::{CloudLayouter, LayoutError};
use crate::geometry::{Point, Rect, Size};

/// Placement tuning.
#[derive(Debug, Clone, Copy)]
pub struct LayouterConfig {
    /// Distance (px) moved per compaction increment toward the center.
    pub compaction_step: f64,
    /// Candidates allowed without the traversal moving farther out, before
    /// `Stalled`. The allowance grows by `stall_per_px` for every px of radius
    /// reached, since a spiral revisits the same radius for longer the wider it gets.
    pub stall_limit: usize,
    pub stall_per_px: f64,
    /// Spatial grid cell size (px) for overlap queries.
    pub grid_cell: i32,
}

impl Default for LayouterConfig {
    fn default() -> Self {
        Self {
            compaction_step: 1.0,
            stall_limit: 100_000,
            stall_per_px: 64.0,
            grid_cell: 64,
        }
    }
}

/// Packs rectangles one at a time into a roughly circular cloud.
///
/// The first rectangle is centered on the generator's center. Every later one
/// goes to the first spiral point where it fits, then slides straight toward
/// the center until the next step would collide.
pub struct CircularCloudLayouter<G: PointGenerator> {
    generator: G,
    center: Point,
    config: LayouterConfig,
    rectangles: Vec<Rect>,
    grid: SpatialGrid,
    /// Farthest distance from the center to any placed corner.
    reach: f64,
}

impl<G: PointGenerator> CircularCloudLayouter<G> {
    pub fn new(generator: G) -> Self {
        Self::with_config(generator, LayouterConfig::default())
    }

    pub fn with_config(generator: G, config: LayouterConfig) -> Self {
        let center = generator.center();
        Self {
            generator,
            center,
            grid: SpatialGrid::new(config.grid_cell),
            config,
            rectangles: Vec::new(),
            reach: 0.0,
        }
    }

    fn overlaps_placed(&self, rect: &Rect) -> bool {
        self.grid.overlaps_any(rect, &self.rectangles)
    }

    /// Walk a fresh spiral traversal until a candidate fits.
    ///
    /// Every placed rectangle lies inside the disk of radius `reach`, so a
    /// candidate centered farther out than `reach` plus its own half-diagonal
    /// cannot overlap anything and is taken without a grid query.
    fn find_free_position(&self, size: Size) -> Result<Rect, LayoutError> {
        let half_diagonal = (size.width as f64).hypot(size.height as f64) / 2.0;
        let free_radius = self.reach + half_diagonal + 1.0;

        let mut tried = 0usize;
        let mut farthest = f64::NEG_INFINITY;
        let mut stalled = 0usize;
        for point in self.generator.points() {
            tried += 1;
            let distance = point.distance_to(self.center);
            let candidate = Rect::centered_at(point, size);
            if distance > free_radius || !self.overlaps_placed(&candidate) {
                tracing::trace!("Free position after {} candidates: {:?}", tried, candidate);
                return Ok(candidate);
            }

            if distance > farthest {
                farthest = distance;
                stalled = 0;
                continue;
            }
            stalled += 1;
            let allowance =
                self.config.stall_limit as f64 + self.config.stall_per_px.max(0.0) * farthest;
            if stalled as f64 > allowance {
                return Err(LayoutError::Stalled {
                    candidates: tried,
                    radius: farthest.round() as i64,
                });
            }
        }
        Err(LayoutError::GeneratorExhausted { candidates: tried })
    }

    /// Slide `rect` along the line to the center; keep the last collision-free spot.
    fn compact(&self, rect: Rect) -> Rect {
        let start = rect.center();
        let dx = (self.center.x - start.x) as f64;
        let dy = (self.center.y - start.y) as f64;
        let distance = dx.hypot(dy);
        let step = if self.config.compaction_step > 0.0 {
            self.config.compaction_step.min(1.0)
        } else {
            1.0
        };
        if distance < step {
            return rect;
        }

        let increments = (distance / step).ceil() as usize;
        let mut best = rect;
        for k in 1..=increments {
            let t = (k as f64 * step / distance).min(1.0);
            let center = Point::new(
                start.x + (dx * t).round() as i32,
                start.y + (dy * t).round() as i32,
            );
            let moved = Rect::centered_at(center, rect.size());
            if moved == best {
                continue;
            }
            if self.overlaps_placed(&moved) {
                break;
            }
            best = moved;
        }
        best
    }

    fn record(&mut self, rect: Rect) {
        let corners = [
            Point::new(rect.x, rect.y),
            Point::new(rect.right(), rect.y),
            Point::new(rect.x, rect.bottom()),
            Point::new(rect.right(), rect.bottom()),
        ];
        for corner in corners {
            self.reach = self.reach.max(corner.distance_to(self.center));
        }
        let index = self.rectangles.len();
        self.grid.insert(index, &rect);
        self.rectangles.push(rect);
    }
}

impl<G: PointGenerator> CloudLayouter for CircularCloudLayouter<G> {
    fn center(&self) -> Point {
        self.center
    }

    fn place_next_rectangle(&mut self, size: Size) -> Result<Rect, LayoutError> {
        if !size.is_positive() {
            return Err(LayoutError::InvalidSize {
                width: size.width,
                height: size.height,
            });
        }

        let rect = if self.rectangles.is_empty() {
            Rect::centered_at(self.center, size)
        } else {
            let candidate = self.find_free_position(size)?;
            let compacted = self.compact(candidate);
            tracing::debug!(
                "Placed #{} {}x{}: spiral {:?} -> compacted {:?} ({:.1}px closer)",
                self.rectangles.len(),
                size.width,
                size.height,
                candidate.center(),
                compacted.center(),
                candidate.center().distance_to(self.center)
                    - compacted.center().distance_to(self.center)
            );
            compacted
        };

        self.record(rect);
        Ok(rect)
    }

    fn rectangles(&self) -> &[Rect] {
        &self.rectangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::spiral::SpiralPointsGenerator;
    use crate::layout::stats::{find_overlap, LayoutStats};

    /// Finite, hand-written candidate sequence.
    struct ScriptedGenerator {
        center: Point,
        points: Vec<Point>,
    }

    impl PointGenerator for ScriptedGenerator {
        fn center(&self) -> Point {
            self.center
        }

        fn points(&self) -> Box<dyn Iterator<Item = Point> + '_> {
            Box::new(self.points.iter().copied())
        }
    }

    fn spiral_layouter(center: Point) -> CircularCloudLayouter<SpiralPointsGenerator> {
        CircularCloudLayouter::new(SpiralPointsGenerator::new(center))
    }

    /// Deterministic pseudo-random sizes (LCG), widths wider than heights like words.
    fn word_like_sizes(count: usize, seed: u64) -> Vec<Size> {
        let mut state = seed;
        let mut next = move |lo: i32, hi: i32| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            lo + ((state >> 33) % (hi - lo) as u64) as i32
        };
        let mut sizes: Vec<Size> = (0..count)
            .map(|_| {
                let h = next(8, 40);
                Size::new(h * next(2, 6), h)
            })
            .collect();
        sizes.sort_by_key(|s| std::cmp::Reverse(s.area()));
        sizes
    }

    #[test]
    fn first_rectangle_is_centered_on_center() {
        let center = Point::new(500, 500);
        let mut layouter = spiral_layouter(center);
        let rect = layouter.place_next_rectangle(Size::new(31, 17)).unwrap();
        assert_eq!(rect.center(), center);
        assert_eq!(rect.size(), Size::new(31, 17));
    }

    #[test]
    fn rejects_non_positive_sizes() {
        let mut layouter = spiral_layouter(Point::new(0, 0));
        for size in [Size::new(0, 10), Size::new(10, 0), Size::new(10, -1), Size::new(-4, -4)] {
            let err = layouter.place_next_rectangle(size).unwrap_err();
            assert_eq!(err, LayoutError::InvalidSize { width: size.width, height: size.height });
            assert!(err.is_invalid_argument());
        }
        assert!(layouter.rectangles().is_empty());
        assert!(layouter.place_next_rectangle(Size::new(1, 1)).is_ok());
    }

    #[test]
    fn placed_rectangles_never_overlap() {
        let mut layouter = spiral_layouter(Point::new(0, 0));
        for size in word_like_sizes(120, 7) {
            layouter.place_next_rectangle(size).unwrap();
        }
        assert_eq!(layouter.rectangles().len(), 120);
        assert_eq!(find_overlap(layouter.rectangles()), None);
    }

    #[test]
    fn unsorted_and_tiny_sizes_never_overlap() {
        let mut layouter = spiral_layouter(Point::new(-40, 25));
        let mut sizes = word_like_sizes(60, 99);
        sizes.reverse();
        sizes.extend([Size::new(1, 1), Size::new(1, 30), Size::new(200, 1)]);
        for size in sizes {
            layouter.place_next_rectangle(size).unwrap();
        }
        assert_eq!(find_overlap(layouter.rectangles()), None);
    }

    #[test]
    fn replay_is_deterministic() {
        let sizes = word_like_sizes(40, 3);
        let run = || {
            let mut layouter = spiral_layouter(Point::new(250, 250));
            sizes
                .iter()
                .map(|&s| layouter.place_next_rectangle(s).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn compaction_pulls_candidate_up_against_neighbour() {
        let center = Point::new(0, 0);
        let generator = ScriptedGenerator {
            center,
            points: vec![Point::new(100, 0)],
        };
        let mut layouter = CircularCloudLayouter::new(generator);
        layouter.place_next_rectangle(Size::new(10, 10)).unwrap();
        let second = layouter.place_next_rectangle(Size::new(10, 10)).unwrap();

        // Without compaction the rectangle would sit at the scripted point, 100px out.
        let uncompacted = Rect::centered_at(Point::new(100, 0), Size::new(10, 10));
        assert!(second.center().distance_to(center) < uncompacted.center().distance_to(center));
        assert_eq!(second, Rect::centered_at(Point::new(10, 0), Size::new(10, 10)));
        assert!(!second.overlaps(&layouter.rectangles()[0]));
    }

    #[test]
    fn compaction_follows_diagonal_direction() {
        let center = Point::new(0, 0);
        let generator = ScriptedGenerator {
            center,
            points: vec![Point::new(60, 60)],
        };
        let mut layouter = CircularCloudLayouter::new(generator);
        layouter.place_next_rectangle(Size::new(20, 20)).unwrap();
        let second = layouter.place_next_rectangle(Size::new(20, 20)).unwrap();

        let c = second.center();
        assert_eq!(c.x, c.y);
        assert!(c.x < 60);
        assert!(!second.overlaps(&layouter.rectangles()[0]));
    }

    #[test]
    fn scripted_generator_skips_occupied_points() {
        let center = Point::new(0, 0);
        let generator = ScriptedGenerator {
            center,
            points: vec![Point::new(0, 0), Point::new(3, 0), Point::new(0, 50)],
        };
        let mut layouter = CircularCloudLayouter::new(generator);
        layouter.place_next_rectangle(Size::new(10, 10)).unwrap();
        let second = layouter.place_next_rectangle(Size::new(10, 10)).unwrap();
        assert_eq!(second, Rect::centered_at(Point::new(0, 10), Size::new(10, 10)));
    }

    #[test]
    fn exhausted_generator_is_an_internal_error() {
        let generator = ScriptedGenerator {
            center: Point::new(0, 0),
            points: vec![Point::new(0, 0), Point::new(1, 1)],
        };
        let mut layouter = CircularCloudLayouter::new(generator);
        layouter.place_next_rectangle(Size::new(10, 10)).unwrap();
        let err = layouter.place_next_rectangle(Size::new(10, 10)).unwrap_err();
        assert_eq!(err, LayoutError::GeneratorExhausted { candidates: 2 });
        assert!(!err.is_invalid_argument());
        assert_eq!(layouter.rectangles().len(), 1);
    }

    /// Repeats its points forever without moving outward.
    struct CyclingGenerator {
        points: Vec<Point>,
    }

    impl PointGenerator for CyclingGenerator {
        fn center(&self) -> Point {
            Point::new(0, 0)
        }

        fn points(&self) -> Box<dyn Iterator<Item = Point> + '_> {
            Box::new(self.points.iter().copied().cycle())
        }
    }

    #[test]
    fn stalled_generator_is_reported_instead_of_spinning() {
        let config = LayouterConfig {
            stall_limit: 50,
            ..LayouterConfig::default()
        };
        let generator = CyclingGenerator {
            points: vec![Point::new(0, 0), Point::new(1, 0), Point::new(0, 1)],
        };
        let mut layouter = CircularCloudLayouter::with_config(generator, config);
        layouter.place_next_rectangle(Size::new(10, 10)).unwrap();
        let err = layouter.place_next_rectangle(Size::new(10, 10)).unwrap_err();
        assert!(matches!(err, LayoutError::Stalled { radius: 1, .. }), "{err:?}");
        assert!(!err.is_invalid_argument());
        assert_eq!(layouter.rectangles().len(), 1);
    }

    #[test]
    fn far_free_space_is_reached_with_a_tiny_stall_budget() {
        // A fixed candidate budget this small would give up long before radius 1000.
        let config = LayouterConfig {
            stall_limit: 16,
            ..LayouterConfig::default()
        };
        let center = Point::new(0, 0);
        let mut layouter =
            CircularCloudLayouter::with_config(SpiralPointsGenerator::new(center), config);
        let big = layouter.place_next_rectangle(Size::new(2_000, 2_000)).unwrap();
        let small = layouter.place_next_rectangle(Size::new(10, 10)).unwrap();

        assert!(!small.overlaps(&big));
        assert!(small.center().distance_to(center) >= 1_005.0);
        // Compaction leaves it flush against the big square.
        let flush = small.right() == big.x
            || small.x == big.right()
            || small.bottom() == big.y
            || small.y == big.bottom();
        assert!(flush, "{small:?}");
    }

    #[test]
    fn point_outside_the_cloud_is_accepted_and_compacted() {
        let center = Point::new(0, 0);
        let generator = ScriptedGenerator {
            center,
            points: vec![Point::new(0, 0), Point::new(500, 0)],
        };
        let mut layouter = CircularCloudLayouter::new(generator);
        layouter.place_next_rectangle(Size::new(40, 40)).unwrap();
        let second = layouter.place_next_rectangle(Size::new(40, 40)).unwrap();
        assert_eq!(second, Rect::centered_at(Point::new(40, 0), Size::new(40, 40)));
    }

    #[test]
    fn equal_squares_form_a_compact_blob() {
        let center = Point::new(0, 0);
        let mut layouter = spiral_layouter(center);
        for _ in 0..50 {
            layouter.place_next_rectangle(Size::new(20, 20)).unwrap();
        }
        let stats = LayoutStats::compute(center, layouter.rectangles());
        let disk_radius = (stats.covered_area as f64 / std::f64::consts::PI).sqrt();
        assert!(stats.max_radius < disk_radius * 2.0, "{stats:?}");
        assert!(stats.aspect_ratio < 1.6, "{stats:?}");
    }
}
