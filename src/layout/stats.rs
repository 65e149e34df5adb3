use crate::geometry::{Point, Rect};

/// Shape summary of a finished layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutStats {
    pub count: usize,
    /// Bounding box of all rectangles (None when empty).
    pub bounds: Option<Rect>,
    /// Sum of rectangle areas (px²).
    pub covered_area: i64,
    /// covered_area / bounding box area, 0 when empty.
    pub density: f64,
    /// Largest center-to-center distance from the layout center (px).
    pub max_radius: f64,
    pub mean_radius: f64,
    /// Long side / short side of the bounding box (1.0 = square).
    pub aspect_ratio: f64,
}

impl LayoutStats {
    pub fn compute(center: Point, rects: &[Rect]) -> Self {
        let bounds = rects.iter().copied().reduce(|acc, r| acc.union(&r));
        let covered_area: i64 = rects.iter().map(Rect::area).sum();
        let radii: Vec<f64> = rects.iter().map(|r| r.center().distance_to(center)).collect();
        let max_radius = radii.iter().copied().fold(0.0, f64::max);
        let mean_radius = if radii.is_empty() {
            0.0
        } else {
            radii.iter().sum::<f64>() / radii.len() as f64
        };

        let (density, aspect_ratio) = match bounds {
            Some(b) if b.area() > 0 => {
                let long = b.w.max(b.h) as f64;
                let short = b.w.min(b.h).max(1) as f64;
                (covered_area as f64 / b.area() as f64, long / short)
            }
            _ => (0.0, 1.0),
        };

        Self {
            count: rects.len(),
            bounds,
            covered_area,
            density,
            max_radius,
            mean_radius,
            aspect_ratio,
        }
    }
}

/// First pair of indices whose rectangles overlap, if any. O(n²); diagnostics only.
pub fn find_overlap(rects: &[Rect]) -> Option<(usize, usize)> {
    for (i, a) in rects.iter().enumerate() {
        for (j, b) in rects.iter().enumerate().skip(i + 1) {
            if a.overlaps(b) {
                return Some((i, j));
            }
        }
    }
    None
}
