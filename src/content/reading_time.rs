//! Reading time estimation

use serde::{Serialize, Serializer};
use std::fmt;

use super::ContentBlock;

/// Assumed reading speed
pub const WORDS_PER_MINUTE: usize = 200;

/// Approximate time needed to read a post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingEstimate {
    UnderOneMinute,
    /// Whole minutes, always at least one
    Minutes(usize),
}

impl ReadingEstimate {
    /// Classify a total word count, rounding minutes up
    pub fn from_word_count(words: usize) -> Self {
        if words < WORDS_PER_MINUTE {
            ReadingEstimate::UnderOneMinute
        } else {
            ReadingEstimate::Minutes(words.div_ceil(WORDS_PER_MINUTE))
        }
    }
}

impl fmt::Display for ReadingEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingEstimate::UnderOneMinute => write!(f, "< 1 min"),
            ReadingEstimate::Minutes(minutes) => write!(f, "{} min", minutes),
        }
    }
}

impl Serialize for ReadingEstimate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Count whitespace-delimited words; empty or blank text has none
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimate the reading time of a post's sections
pub fn estimate(content: &[ContentBlock]) -> ReadingEstimate {
    let total_words: usize = content.iter().map(ContentBlock::word_count).sum();
    ReadingEstimate::from_word_count(total_words)
}
