pub mod hashed_embedding;
pub mod lexicon;
pub mod talk_ratio;

pub use hashed_embedding::*;
pub use lexicon::*;
pub use talk_ratio::*;

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w+\b").expect("word pattern is valid"));

/// Split text into lowercase word tokens
///
/// Punctuation separates tokens, so "I'm" yields `i` and `m`.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}
