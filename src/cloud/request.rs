use compact_str::CompactString;

use super::sizing::{FontScale, SizedWord, TagSizer};
use super::words::{sort_by_weight, WordEntry};
use crate::error::CloudError;
use crate::geometry::Size;
use crate::layout::CloudLayouter;
use crate::render::colors::{default_brushes, default_palette, Brush, Color};
use crate::render::text::TextMeasurer;

/// Either one brush for every word or a palette cycled in placement order.
///
/// `None` stands for an absent value and is rejected during validation.
#[derive(Debug, Clone, PartialEq)]
pub enum BrushSource {
    Single(Option<Brush>),
    Palette(Option<Vec<Option<Brush>>>),
}

impl BrushSource {
    fn validate(self) -> Result<Vec<Brush>, CloudError> {
        match self {
            BrushSource::Single(brush) => Ok(vec![brush.ok_or(CloudError::MissingBrush)?]),
            BrushSource::Palette(None) => Err(CloudError::MissingBrushes),
            BrushSource::Palette(Some(brushes)) => brushes
                .into_iter()
                .map(|b| b.ok_or(CloudError::MissingBrush))
                .collect(),
        }
    }
}

/// Everything needed to build one cloud. Optional fields model inputs that may be absent.
pub struct CloudRequest {
    pub words: Option<Vec<WordEntry>>,
    pub tag_colors: Option<Vec<Color>>,
    pub background: Color,
    pub min_tag_size: Size,
    pub max_tag_size: Size,
    pub layouter: Option<Box<dyn CloudLayouter>>,
    /// Must lie strictly inside (0, 1).
    pub reduction_coefficient: f64,
    pub min_font_size: f32,
    pub font_family: Option<CompactString>,
    pub brushes: BrushSource,
}

impl CloudRequest {
    /// Request with default styling; callers adjust the public fields as needed.
    pub fn new(words: Vec<WordEntry>, layouter: Box<dyn CloudLayouter>) -> Self {
        Self {
            words: Some(words),
            tag_colors: Some(default_palette(12).into_iter().map(|c| c.with_alpha(0.25)).collect()),
            background: Color::WHITE,
            min_tag_size: Size::new(1, 1),
            max_tag_size: Size::new(1200, 400),
            layouter: Some(layouter),
            reduction_coefficient: 0.8,
            min_font_size: 12.0,
            font_family: Some(CompactString::new("Sans")),
            brushes: BrushSource::Palette(Some(default_brushes(12).into_iter().map(Some).collect())),
        }
    }

    /// Check every input (in a fixed order, first failure wins) and size every word.
    /// Nothing is placed until all of it has passed.
    pub fn prepare(self, measurer: &dyn TextMeasurer) -> Result<PreparedCloud, CloudError> {
        let mut words = self.words.ok_or(CloudError::MissingWords)?;
        let tag_colors = self.tag_colors.ok_or(CloudError::MissingTagColors)?;
        if !self.min_tag_size.fits_within(self.max_tag_size) {
            return Err(CloudError::TagSizeBounds {
                min: self.min_tag_size,
                max: self.max_tag_size,
            });
        }
        let layouter = self.layouter.ok_or(CloudError::MissingLayouter)?;
        let coefficient = self.reduction_coefficient;
        if !(coefficient > 0.0 && coefficient < 1.0) {
            return Err(CloudError::ReductionCoefficient(coefficient));
        }
        if !(self.min_font_size > 0.0) {
            return Err(CloudError::FontSize(self.min_font_size));
        }
        let font_family = self.font_family.ok_or(CloudError::MissingFontFamily)?;
        let brushes = self.brushes.validate()?;

        sort_by_weight(&mut words);
        let scale = FontScale::for_tag_bounds(self.min_font_size, coefficient, self.max_tag_size);
        let sizer = TagSizer::new(measurer, &font_family, self.min_tag_size, self.max_tag_size);
        let sized = sizer.size_all(&words, &scale)?;

        if !sized.is_empty() && tag_colors.is_empty() {
            tracing::warn!("Empty tag color palette; tags will be left unfilled");
        }
        if !sized.is_empty() && brushes.is_empty() {
            tracing::warn!("Empty brush palette; using the default brush");
        }

        Ok(PreparedCloud {
            words: sized,
            tag_colors,
            background: self.background,
            layouter,
            font_family,
            brushes,
        })
    }
}

/// A request that passed validation: words sorted heaviest first and sized.
pub struct PreparedCloud {
    pub words: Vec<SizedWord>,
    pub tag_colors: Vec<Color>,
    pub background: Color,
    pub layouter: Box<dyn CloudLayouter>,
    pub font_family: CompactString,
    pub brushes: Vec<Brush>,
}

impl PreparedCloud {
    /// Fill color for the `index`-th placed tag.
    pub fn fill_for(&self, index: usize) -> Option<Color> {
        if self.tag_colors.is_empty() {
            None
        } else {
            Some(self.tag_colors[index % self.tag_colors.len()])
        }
    }

    /// Brush for the `index`-th placed tag.
    pub fn brush_for(&self, index: usize) -> Brush {
        if self.brushes.is_empty() {
            Brush::default()
        } else {
            self.brushes[index % self.brushes.len()]
        }
    }
}
