pub mod circular;
pub mod spatial_grid;
pub mod spiral;
pub mod stats;

pub use circular::{CircularCloudLayouter, LayouterConfig};
pub use spiral::{PointGenerator, SpiralConfig, SpiralPointsGenerator};
pub use stats::LayoutStats;

use crate::geometry::{Point, Rect, Size};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("rectangle size must be positive, got {width}x{height}")]
    InvalidSize { width: i32, height: i32 },
    /// The generator stopped moving outward. A generator that keeps growing
    /// always reaches the radius past which every point is free, so this means
    /// the generator is broken, not that the cloud is large.
    #[error("point generator stalled at radius {radius}px after {candidates} candidates")]
    Stalled { candidates: usize, radius: i64 },
    #[error("point generator ran dry after {candidates} candidates")]
    GeneratorExhausted { candidates: usize },
}

impl LayoutError {
    /// True for caller mistakes, false for broken generator / internal invariants.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, LayoutError::InvalidSize { .. })
    }
}

/// Online rectangle placement around a fixed center.
pub trait CloudLayouter {
    fn center(&self) -> Point;

    /// Place a rectangle that overlaps none of the previously placed ones.
    fn place_next_rectangle(&mut self, size: Size) -> Result<Rect, LayoutError>;

    /// Everything placed so far, in placement order.
    fn rectangles(&self) -> &[Rect];
}
