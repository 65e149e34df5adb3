// Archimedean spiral candidate source.
//
// r = a * theta, with a = spacing / 2pi so neighbouring arms are `spacing`
// pixels apart. The angular step shrinks as the radius grows so consecutive
// points stay about `step_length` pixels apart along the arc.

use std::f64::consts::TAU;

use crate::geometry::Point;

/// A source of candidate placement points radiating out from a center.
///
/// Every call to `points` starts a fresh traversal; a traversal never rewinds.
pub trait PointGenerator {
    fn center(&self) -> Point;
    fn points(&self) -> Box<dyn Iterator<Item = Point> + '_>;
}

/// Spiral shape parameters.
#[derive(Debug, Clone, Copy)]
pub struct SpiralConfig {
    /// Radial distance between consecutive arms (px).
    pub spacing: f64,
    /// Target arc length between consecutive points (px).
    pub step_length: f64,
    /// Upper bound on the angular increment near the center (radians).
    pub max_angle_step: f64,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            spacing: 4.0,
            step_length: 2.0,
            max_angle_step: 0.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpiralPointsGenerator {
    center: Point,
    config: SpiralConfig,
}

impl SpiralPointsGenerator {
    pub fn new(center: Point) -> Self {
        Self::with_config(center, SpiralConfig::default())
    }

    pub fn with_config(center: Point, config: SpiralConfig) -> Self {
        // Non-positive parameters would stall the spiral at a fixed radius.
        let config = SpiralConfig {
            spacing: positive_or(config.spacing, SpiralConfig::default().spacing),
            step_length: positive_or(config.step_length, SpiralConfig::default().step_length),
            max_angle_step: positive_or(
                config.max_angle_step,
                SpiralConfig::default().max_angle_step,
            ),
        };
        Self { center, config }
    }

    pub fn config(&self) -> &SpiralConfig {
        &self.config
    }

    /// Concrete iterator for callers that want to avoid the boxed trait object.
    pub fn iter(&self) -> SpiralPoints {
        SpiralPoints {
            center: self.center,
            growth: self.config.spacing / TAU,
            step_length: self.config.step_length,
            max_angle_step: self.config.max_angle_step,
            theta: 0.0,
            last: None,
        }
    }
}

impl PointGenerator for SpiralPointsGenerator {
    fn center(&self) -> Point {
        self.center
    }

    fn points(&self) -> Box<dyn Iterator<Item = Point> + '_> {
        Box::new(self.iter())
    }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

/// One traversal of the spiral. Infinite.
#[derive(Debug, Clone)]
pub struct SpiralPoints {
    center: Point,
    growth: f64,
    step_length: f64,
    max_angle_step: f64,
    theta: f64,
    last: Option<Point>,
}

impl SpiralPoints {
    /// Current radius of the cursor (px).
    pub fn radius(&self) -> f64 {
        self.growth * self.theta
    }

    fn advance(&mut self) -> Point {
        let r = self.radius();
        let point = Point::new(
            self.center.x + (r * self.theta.cos()).round() as i32,
            self.center.y + (r * self.theta.sin()).round() as i32,
        );
        self.theta += (self.step_length / r.max(1.0)).min(self.max_angle_step);
        point
    }
}

impl Iterator for SpiralPoints {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        // Rounding near the center maps several steps onto one pixel; emit it once.
        loop {
            let point = self.advance();
            if self.last != Some(point) {
                self.last = Some(point);
                return Some(point);
            }
        }
    }
}
