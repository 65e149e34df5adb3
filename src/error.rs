use compact_str::CompactString;

use crate::geometry::Size;
use crate::layout::LayoutError;
use crate::render::RenderError;

/// Everything a cloud request can fail with.
///
/// Caller-input variants display exactly the user-facing message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CloudError {
    #[error("Words can't be null")]
    MissingWords,
    #[error("Tags colors can't be null")]
    MissingTagColors,
    #[error("Min tag size must be less or equal than max tag size")]
    TagSizeBounds { min: Size, max: Size },
    #[error("Layouter can't be null")]
    MissingLayouter,
    #[error("Reduction coefficient must be between 0 and 1")]
    ReductionCoefficient(f64),
    #[error("Font size can't be zero or negative")]
    FontSize(f32),
    #[error("Font family can't be null")]
    MissingFontFamily,
    #[error("Brushes can't be null")]
    MissingBrushes,
    #[error("Brush can't be null")]
    MissingBrush,
    #[error("Word is too long for tag cloud")]
    WordTooLong { word: CompactString, size: Size, max: Size },
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed request input.
    InvalidArgument,
    /// A word does not fit the maximum tag size. Its message ("Word is too
    /// long for tag cloud") reads like the invalid-argument ones, but it is
    /// reported separately so callers can tell oversized content from bad input.
    ContentTooLarge,
    /// Broken generator or other invariant violation; a bug, not bad input.
    Internal,
    Render,
}

impl CloudError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CloudError::WordTooLong { .. } => ErrorKind::ContentTooLarge,
            CloudError::Layout(e) if e.is_invalid_argument() => ErrorKind::InvalidArgument,
            CloudError::Layout(_) => ErrorKind::Internal,
            CloudError::Render(_) => ErrorKind::Render,
            _ => ErrorKind::InvalidArgument,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(CloudError::MissingWords.kind(), ErrorKind::InvalidArgument);
        assert_eq!(CloudError::FontSize(-1.0).kind(), ErrorKind::InvalidArgument);
        let too_long = CloudError::WordTooLong {
            word: "x".into(),
            size: Size::new(200, 10),
            max: Size::new(100, 100),
        };
        assert_eq!(too_long.kind(), ErrorKind::ContentTooLarge);
        assert_eq!(
            CloudError::from(LayoutError::InvalidSize { width: 0, height: 3 }).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            CloudError::from(LayoutError::Stalled { candidates: 10, radius: 3 }).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn layout_errors_keep_their_message() {
        let err = CloudError::from(LayoutError::GeneratorExhausted { candidates: 4 });
        assert_eq!(err.to_string(), "point generator ran dry after 4 candidates");
    }
}
