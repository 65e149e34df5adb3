/// RGBA color, components in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn parse_hex(s: &str) -> Option<Color> {
        let hex = s.trim().trim_start_matches('#');
        let channel = |i: usize, len: usize| -> Option<f32> {
            let v = u8::from_str_radix(hex.get(i..i + len)?, 16).ok()?;
            let v = if len == 1 { v * 17 } else { v };
            Some(v as f32 / 255.0)
        };
        match hex.len() {
            3 => Some(Color::new(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?)),
            6 => Some(Color::new(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
            8 => Some(Color::new(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?).with_alpha(channel(6, 2)?)),
            _ => None,
        }
    }

    /// Create a darker version.
    pub fn darken(self, amount: f32) -> Self {
        Self {
            r: (self.r - amount).max(0.0),
            g: (self.g - amount).max(0.0),
            b: (self.b - amount).max(0.0),
            a: self.a,
        }
    }
}

/// Solid paint used for glyphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub color: Color,
}

impl Brush {
    pub const fn solid(color: Color) -> Self {
        Self { color }
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self::solid(Color::BLACK)
    }
}

/// `n` visually distinct colors, hues spread by the golden angle.
pub fn default_palette(n: usize) -> Vec<Color> {
    const GOLDEN: f32 = 0.381_966;
    (0..n)
        .map(|i| hsv_to_rgb((0.58 + i as f32 * GOLDEN).rem_euclid(1.0), 0.62, 0.90))
        .collect()
}

/// Dark versions of `default_palette`, readable on its light fills.
pub fn default_brushes(n: usize) -> Vec<Brush> {
    default_palette(n)
        .into_iter()
        .map(|c| Brush::solid(c.darken(0.55)))
        .collect()
}

/// `h`, `s`, `v` in 0..=1; hue wraps.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Color {
    let chroma = v * s;
    let sector = (h * 6.0).rem_euclid(6.0);
    let second = chroma * (1.0 - ((sector % 2.0) - 1.0).abs());
    let base = v - chroma;
    let [r, g, b] = match sector as u8 {
        0 => [chroma, second, 0.0],
        1 => [second, chroma, 0.0],
        2 => [0.0, chroma, second],
        3 => [0.0, second, chroma],
        4 => [second, 0.0, chroma],
        _ => [chroma, 0.0, second],
    };
    Color::new(r + base, g + base, b + base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Color::parse_hex("#fff"), Some(Color::WHITE));
        assert_eq!(Color::parse_hex("000000"), Some(Color::BLACK));
        assert_eq!(Color::parse_hex("#ff000080").map(Color::to_rgba8), Some([255, 0, 0, 128]));
        assert_eq!(Color::parse_hex("#12"), None);
        assert_eq!(Color::parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn palette_has_requested_len_and_distinct_entries() {
        let palette = default_palette(8);
        assert_eq!(palette.len(), 8);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a.to_rgba8(), b.to_rgba8());
            }
        }
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0).to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0).to_rgba8(), [0, 255, 0, 255]);
        assert_eq!(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0).to_rgba8(), [0, 0, 255, 255]);
        assert_eq!(hsv_to_rgb(1.5, 0.0, 0.5).to_rgba8(), [128, 128, 128, 255]);
    }
}
