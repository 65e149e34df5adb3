use bytemuck::{Pod, Zeroable};
use image::RgbaImage;

use super::colors::Color;
use super::text::{FontLibrary, TextRenderResult};
use super::{CloudRenderer, PlacedTag, RenderError};
use crate::geometry::Rect;

#[derive(Debug, Clone, Copy)]
pub struct CanvasConfig {
    /// Empty border around the cloud's bounding box (px).
    pub margin: u32,
    /// Largest allowed canvas side (px).
    pub max_dimension: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            margin: 20,
            max_dimension: 16_384,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
struct Pixel {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Pixel {
    fn from_color(color: Color) -> Self {
        let [r, g, b, a] = color.to_rgba8();
        Self { r, g, b, a }
    }

    /// Source-over with `coverage` scaling the source alpha.
    fn blend(&mut self, color: Color, coverage: f32) {
        let alpha = (color.a * coverage).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let inv = 1.0 - alpha;
        let mix = |src: f32, dst: u8| ((src * alpha * 255.0) + dst as f32 * inv).round() as u8;
        self.r = mix(color.r, self.r);
        self.g = mix(color.g, self.g);
        self.b = mix(color.b, self.b);
        self.a = ((alpha * 255.0) + self.a as f32 * inv).round().min(255.0) as u8;
    }
}

/// CPU rasterizer: tag fills, then glyph coverage tinted by each tag's brush.
pub struct BitmapRenderer<'f> {
    fonts: &'f FontLibrary,
    config: CanvasConfig,
}

impl<'f> BitmapRenderer<'f> {
    pub fn new(fonts: &'f FontLibrary) -> Self {
        Self::with_config(fonts, CanvasConfig::default())
    }

    pub fn with_config(fonts: &'f FontLibrary, config: CanvasConfig) -> Self {
        Self { fonts, config }
    }
}

struct Canvas {
    width: u32,
    height: u32,
    /// Added to layout coordinates to get pixel coordinates.
    offset: (i32, i32),
    pixels: Vec<Pixel>,
}

impl Canvas {
    fn fill_rect(&mut self, rect: &Rect, color: Color) {
        let x0 = (rect.x + self.offset.0).clamp(0, self.width as i32) as u32;
        let y0 = (rect.y + self.offset.1).clamp(0, self.height as i32) as u32;
        let x1 = (rect.right() + self.offset.0).clamp(0, self.width as i32) as u32;
        let y1 = (rect.bottom() + self.offset.1).clamp(0, self.height as i32) as u32;

        for py in y0..y1 {
            let row = (py * self.width) as usize;
            for px in x0..x1 {
                self.pixels[row + px as usize].blend(color, 1.0);
            }
        }
    }

    /// Draw glyph masks with the text box's top-left at layout point (x, y).
    fn draw_text(&mut self, text: &TextRenderResult, x: i32, y: i32, color: Color) {
        for glyph in &text.glyphs {
            let gx = x + self.offset.0 + glyph.x.round() as i32;
            let gy = y + self.offset.1 + glyph.y.round() as i32;
            for row in 0..glyph.height {
                let py = gy + row as i32;
                if py < 0 || py >= self.height as i32 {
                    continue;
                }
                for col in 0..glyph.width {
                    let px = gx + col as i32;
                    if px < 0 || px >= self.width as i32 {
                        continue;
                    }
                    let coverage = glyph.coverage[row * glyph.width + col] as f32 / 255.0;
                    let idx = py as usize * self.width as usize + px as usize;
                    self.pixels[idx].blend(color, coverage);
                }
            }
        }
    }

    fn into_image(self) -> Result<RgbaImage, RenderError> {
        let bytes: Vec<u8> = bytemuck::cast_slice(&self.pixels).to_vec();
        RgbaImage::from_raw(self.width, self.height, bytes).ok_or(RenderError::BufferMismatch {
            width: self.width,
            height: self.height,
        })
    }
}

impl BitmapRenderer<'_> {
    fn canvas_for(&self, background: Color, tags: &[PlacedTag]) -> Result<Canvas, RenderError> {
        let margin = self.config.margin as i64;
        let bounds = tags.iter().map(|t| t.rect).reduce(|acc, r| acc.union(&r));
        let (width, height, offset) = match bounds {
            Some(b) => (
                b.w as i64 + 2 * margin,
                b.h as i64 + 2 * margin,
                (margin as i32 - b.x, margin as i32 - b.y),
            ),
            None => (2 * margin, 2 * margin, (margin as i32, margin as i32)),
        };
        let (width, height) = (width.max(1), height.max(1));

        let limit = self.config.max_dimension;
        if width > limit as i64 || height > limit as i64 {
            return Err(RenderError::CanvasTooLarge { width, height, limit });
        }

        let (width, height) = (width as u32, height as u32);
        Ok(Canvas {
            width,
            height,
            offset,
            pixels: vec![Pixel::from_color(background); width as usize * height as usize],
        })
    }
}

impl CloudRenderer for BitmapRenderer<'_> {
    fn draw_cloud(&self, background: Color, tags: &[PlacedTag]) -> Result<RgbaImage, RenderError> {
        let mut canvas = self.canvas_for(background, tags)?;
        tracing::info!(
            "Rasterizing {} tags onto {}x{} canvas",
            tags.len(),
            canvas.width,
            canvas.height
        );
        if self.fonts.is_empty() && !tags.is_empty() {
            tracing::warn!("No fonts loaded; drawing tag boxes without glyphs");
        }

        for tag in tags {
            if let Some(fill) = tag.fill {
                canvas.fill_rect(&tag.rect, fill);
            }

            let Some(text) = self.fonts.render_text(&tag.text, &tag.font_family, tag.font_size)
            else {
                continue;
            };
            // Center the ink box inside the tag rectangle.
            let x = tag.rect.x + (tag.rect.w - text.width as i32) / 2;
            let y = tag.rect.y + (tag.rect.h - text.height as i32) / 2;
            canvas.draw_text(&text, x, y, tag.brush.color);
        }

        canvas.into_image()
    }
}
