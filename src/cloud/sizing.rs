// Word weight -> font size -> tag rectangle size.
//
// Font size depends only on a word's rank among the distinct weights:
//
//   font(rank) = clamp(min_font / c^(levels - 1 - rank), min_font, max_font)
//
// so the rarest words sit at min_font and each step up in weight divides by the
// reduction coefficient c (equivalently, each step down multiplies by c).

use rayon::prelude::*;

use super::words::WordEntry;
use crate::error::CloudError;
use crate::geometry::Size;
use crate::render::text::TextMeasurer;

/// Line box height relative to font size; caps font size at the max tag height.
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Pure weight-rank -> font-size transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontScale {
    pub min_font_size: f32,
    pub max_font_size: f32,
    /// In (0, 1); smaller shrinks faster per rank.
    pub reduction_coefficient: f64,
}

impl FontScale {
    /// Scale whose largest font still yields a line no taller than `max_tag`.
    pub fn for_tag_bounds(min_font_size: f32, reduction_coefficient: f64, max_tag: Size) -> Self {
        let max_font_size = (max_tag.height as f32 / LINE_HEIGHT_FACTOR).max(min_font_size);
        Self {
            min_font_size,
            max_font_size,
            reduction_coefficient,
        }
    }

    /// Font size for `rank` (0 = heaviest) out of `levels` distinct weights.
    pub fn font_size(&self, rank: usize, levels: usize) -> f32 {
        let levels = levels.max(1);
        let steps_above_rarest = (levels - 1).saturating_sub(rank).min(i32::MAX as usize) as i32;
        let size = self.min_font_size as f64 / self.reduction_coefficient.powi(steps_above_rarest);
        if size.is_finite() {
            (size as f32).clamp(self.min_font_size, self.max_font_size)
        } else {
            self.max_font_size
        }
    }

    /// Font size per entry, in the entries' order.
    pub fn font_sizes(&self, entries: &[WordEntry]) -> Vec<f32> {
        let mut distinct: Vec<u32> = entries.iter().map(|e| e.weight).collect();
        distinct.sort_unstable_by(|a, b| b.cmp(a));
        distinct.dedup();

        entries
            .iter()
            .map(|e| {
                let rank = distinct.partition_point(|&w| w > e.weight);
                self.font_size(rank, distinct.len())
            })
            .collect()
    }
}

/// A word with its font and final tag rectangle size.
#[derive(Debug, Clone, PartialEq)]
pub struct SizedWord {
    pub entry: WordEntry,
    pub font_size: f32,
    pub size: Size,
}

/// Measures words and turns footprints into tag sizes within [min_tag, max_tag].
pub struct TagSizer<'m> {
    measurer: &'m dyn TextMeasurer,
    font_family: &'m str,
    min_tag: Size,
    max_tag: Size,
}

impl<'m> TagSizer<'m> {
    pub fn new(measurer: &'m dyn TextMeasurer, font_family: &'m str, min_tag: Size, max_tag: Size) -> Self {
        Self {
            measurer,
            font_family,
            min_tag,
            max_tag,
        }
    }

    /// Tag size for one word, or `WordTooLong` when its footprint exceeds the max tag size.
    pub fn size_word(&self, entry: &WordEntry, font_size: f32) -> Result<SizedWord, CloudError> {
        let measured = self.measurer.measure(&entry.text, self.font_family, font_size);
        if !measured.fits_within(self.max_tag) {
            return Err(CloudError::WordTooLong {
                word: entry.text.clone(),
                size: measured,
                max: self.max_tag,
            });
        }
        Ok(SizedWord {
            entry: entry.clone(),
            font_size,
            size: measured.max(self.min_tag),
        })
    }

    /// Size every word. Measurement runs in parallel; the first failure in input order wins.
    pub fn size_all(&self, entries: &[WordEntry], scale: &FontScale) -> Result<Vec<SizedWord>, CloudError> {
        let fonts = scale.font_sizes(entries);
        let results: Vec<Result<SizedWord, CloudError>> = entries
            .par_iter()
            .zip(fonts.par_iter())
            .map(|(entry, &font_size)| self.size_word(entry, font_size))
            .collect();
        results.into_iter().collect()
    }
}
