use std::collections::{HashMap, HashSet};

use compact_str::CompactString;

/// A word and its weight (occurrence count).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WordEntry {
    pub text: CompactString,
    pub weight: u32,
}

impl WordEntry {
    pub fn new(text: impl Into<CompactString>, weight: u32) -> Self {
        Self {
            text: text.into(),
            weight,
        }
    }
}

/// Heaviest first; equal weights alphabetically so the order is stable across runs.
pub fn sort_by_weight(entries: &mut [WordEntry]) {
    entries.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.text.cmp(&b.text)));
}

/// Split running text into word tokens (letters, digits, inner apostrophes and hyphens).
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
        .map(|t| t.trim_matches(|c| c == '\'' || c == '-'))
        .filter(|t| !t.is_empty())
}

/// Count case-insensitive occurrences. Result is sorted with `sort_by_weight`.
pub fn count_words<'a, I>(words: I) -> Vec<WordEntry>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<CompactString, u32> = HashMap::new();
    for word in words {
        let key = CompactString::from(word.to_lowercase());
        *counts.entry(key).or_default() += 1;
    }
    let mut entries: Vec<WordEntry> = counts
        .into_iter()
        .map(|(text, weight)| WordEntry { text, weight })
        .collect();
    sort_by_weight(&mut entries);
    entries
}

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
    "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has", "have", "he",
    "her", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "me", "my",
    "no", "not", "of", "on", "or", "our", "out", "she", "so", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "this", "to", "up", "was", "we", "were", "what",
    "when", "which", "who", "will", "with", "would", "you", "your",
];

/// Drops short and boring words before sizing.
#[derive(Debug, Clone)]
pub struct WordFilter {
    /// Minimum length in chars.
    pub min_length: usize,
    /// Lower-case words to drop.
    pub stop_words: HashSet<CompactString>,
}

impl Default for WordFilter {
    fn default() -> Self {
        Self {
            min_length: 3,
            stop_words: STOP_WORDS.iter().map(|w| CompactString::new(w)).collect(),
        }
    }
}

impl WordFilter {
    /// Filter that keeps everything.
    pub fn none() -> Self {
        Self {
            min_length: 0,
            stop_words: HashSet::new(),
        }
    }

    pub fn accepts(&self, word: &str) -> bool {
        word.chars().count() >= self.min_length
            && !self.stop_words.contains(word.to_lowercase().as_str())
    }

    pub fn apply(&self, entries: Vec<WordEntry>) -> Vec<WordEntry> {
        entries.into_iter().filter(|e| self.accepts(&e.text)).collect()
    }
}
