pub mod canvas;
pub mod colors;
pub mod text;

pub use canvas::{BitmapRenderer, CanvasConfig};
pub use colors::{Brush, Color};
pub use text::{FontLibrary, MonospaceMeasurer, TextMeasurer};

use compact_str::CompactString;
use image::RgbaImage;

use crate::geometry::Rect;

/// One word, fully sized and positioned, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTag {
    pub rect: Rect,
    pub text: CompactString,
    pub font_family: CompactString,
    pub font_size: f32,
    pub brush: Brush,
    /// Fill behind the word; None leaves the background showing.
    pub fill: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("canvas of {width}x{height} exceeds the {limit}px limit")]
    CanvasTooLarge { width: i64, height: i64, limit: u32 },
    #[error("pixel buffer does not match a {width}x{height} canvas")]
    BufferMismatch { width: u32, height: u32 },
}

/// Turns placed tags into a bitmap. Canvas sizing is the renderer's call.
pub trait CloudRenderer {
    fn draw_cloud(&self, background: Color, tags: &[PlacedTag]) -> Result<RgbaImage, RenderError>;
}
