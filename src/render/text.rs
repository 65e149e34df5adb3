use std::collections::HashMap;
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use fontdue::Font;

use crate::geometry::Size;

/// Pixel footprint of a word at a given font. Must be deterministic.
///
/// `Sync` so measurement can fan out across rayon workers.
pub trait TextMeasurer: Sync {
    fn measure(&self, text: &str, font_family: &str, font_size: f32) -> Size;
}

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("failed to read font file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse font file {path}: {reason}")]
    Parse { path: PathBuf, reason: &'static str },
    #[error("unable to load a system font from known locations")]
    NoSystemFont,
}

/// Fixed-advance metrics: every char is `char_width_factor * size` wide.
/// Needs no font files, so it is what tests and headless runs measure with.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasurer {
    pub char_width_factor: f32,
    pub line_height_factor: f32,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self {
            char_width_factor: 0.6,
            line_height_factor: 1.2,
        }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, _font_family: &str, font_size: f32) -> Size {
        let chars = text.chars().count() as f32;
        let size = font_size.max(0.0);
        Size::new(
            ceil_px(chars * size * self.char_width_factor),
            ceil_px(size * self.line_height_factor),
        )
    }
}

/// Round up to whole pixels, ignoring float noise like 30.000002.
fn ceil_px(v: f32) -> i32 {
    ((v - 1e-3).ceil() as i32).max(1)
}

/// fontdue fonts keyed by family name.
///
/// The first font added becomes the fallback for unknown families.
#[derive(Default)]
pub struct FontLibrary {
    fonts: HashMap<CompactString, Font>,
    default_family: Option<CompactString>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_font(&mut self, family: &str, font: Font) {
        let family = CompactString::new(family);
        if self.default_family.is_none() {
            self.default_family = Some(family.clone());
        }
        self.fonts.insert(family, font);
    }

    pub fn load_font_file(&mut self, family: &str, path: &Path) -> Result<(), FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font = Font::from_bytes(data, fontdue::FontSettings::default()).map_err(|reason| {
            FontError::Parse {
                path: path.to_path_buf(),
                reason,
            }
        })?;
        self.add_font(family, font);
        tracing::info!("Loaded font '{}' from {}", family, path.display());
        Ok(())
    }

    /// Register the first readable font from the usual system locations under `family`.
    pub fn load_system_font(&mut self, family: &str) -> Result<(), FontError> {
        let mut candidates: Vec<PathBuf> = vec![
            PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
            PathBuf::from("/usr/share/fonts/TTF/DejaVuSans.ttf"),
            PathBuf::from("/usr/share/fonts/dejavu/DejaVuSans.ttf"),
            PathBuf::from("/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf"),
            PathBuf::from("/System/Library/Fonts/Supplemental/Arial.ttf"),
            PathBuf::from("/Library/Fonts/Arial.ttf"),
        ];

        if let Ok(windir) = std::env::var("WINDIR") {
            candidates.push(PathBuf::from(format!("{windir}\\Fonts\\segoeui.ttf")));
            candidates.push(PathBuf::from(format!("{windir}\\Fonts\\arial.ttf")));
        }
        candidates.push(PathBuf::from("C:\\Windows\\Fonts\\arial.ttf"));

        for path in candidates {
            if self.load_font_file(family, &path).is_ok() {
                return Ok(());
            }
        }

        Err(FontError::NoSystemFont)
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Font for `family`, or the fallback font.
    pub fn font(&self, family: &str) -> Option<&Font> {
        self.fonts
            .get(family)
            .or_else(|| self.default_family.as_ref().and_then(|f| self.fonts.get(f)))
    }

    fn layout_line(font: &Font, text: &str, font_size: f32) -> Layout {
        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[font], &TextStyle::new(text, font_size, 0));
        layout
    }

    /// Rasterize `text` into per-glyph coverage masks, positioned from the line's top-left.
    pub fn render_text(
        &self,
        text: &str,
        font_family: &str,
        font_size: f32,
    ) -> Option<TextRenderResult> {
        let font = self.font(font_family)?;
        let layout = Self::layout_line(font, text, font_size);

        let mut glyphs = Vec::new();
        let mut width: f32 = 0.0;
        for glyph in layout.glyphs() {
            let (metrics, coverage) = font.rasterize_config(glyph.key);
            if metrics.width == 0 || metrics.height == 0 {
                continue;
            }
            width = width.max(glyph.x + metrics.width as f32);
            glyphs.push(TextGlyph {
                x: glyph.x,
                y: glyph.y,
                width: metrics.width,
                height: metrics.height,
                coverage,
            });
        }

        if glyphs.is_empty() {
            return None;
        }

        Some(TextRenderResult {
            glyphs,
            width: width.ceil() as u32,
            height: layout.height().ceil() as u32,
        })
    }
}

impl TextMeasurer for FontLibrary {
    fn measure(&self, text: &str, font_family: &str, font_size: f32) -> Size {
        let Some(font) = self.font(font_family) else {
            tracing::warn!("No fonts loaded; estimating '{}' with fixed advances", text);
            return MonospaceMeasurer::default().measure(text, font_family, font_size);
        };

        let layout = Self::layout_line(font, text, font_size);
        let width = layout
            .glyphs()
            .iter()
            .map(|g| g.x + g.width as f32)
            .fold(0.0_f32, f32::max);

        Size::new(ceil_px(width), ceil_px(layout.height()))
    }
}

pub struct TextRenderResult {
    pub glyphs: Vec<TextGlyph>,
    pub width: u32,
    pub height: u32,
}

pub struct TextGlyph {
    pub x: f32,
    pub y: f32,
    pub width: usize,
    pub height: usize,
    /// Row-major 8-bit coverage, `width * height` bytes.
    pub coverage: Vec<u8>,
}
