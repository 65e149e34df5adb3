pub mod request;
pub mod sizing;
pub mod words;

pub use request::{BrushSource, CloudRequest, PreparedCloud};
pub use sizing::{FontScale, SizedWord, TagSizer};
pub use words::{count_words, tokenize, WordEntry, WordFilter};
