//! Report tokenization
//!
//! Splits raw report text into whitespace-delimited groups. Order is kept and
//! nothing is dropped; deciding what a group means is left to the extractors.

/// One whitespace-delimited group and its position in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Zero-based index among the report's groups
    pub position: usize,

    /// Group text, borrowed from the raw report
    pub text: &'a str,
}

impl<'a> Token<'a> {
    /// Group text without a trailing end-of-report `=` marker
    pub fn group(&self) -> &'a str {
        self.text.trim_end_matches('=')
    }
}

/// Split a raw report into groups
///
/// Leading, trailing and repeated whitespace (including line breaks) is
/// collapsed. Empty input yields an empty sequence.
pub fn tokenize(raw: &str) -> Vec<Token<'_>> {
    raw.split_whitespace()
        .enumerate()
        .map(|(position, text)| Token { position, text })
        .collect()
}
