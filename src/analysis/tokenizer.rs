//! Regex tokenizer.

use regex::Regex;

use crate::error::{Result, RiskError};

/// Runs of two or more word characters; single letters and punctuation are
/// dropped.
pub const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Splits text into the substrings matched by [`TOKEN_PATTERN`].
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    pattern: Regex,
}

impl RegexTokenizer {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(TOKEN_PATTERN)
            .map_err(|e| RiskError::analysis(format!("invalid token pattern: {e}")))?;
        Ok(RegexTokenizer { pattern })
    }

    /// Tokens in order of appearance, borrowed from `text`.
    pub fn tokenize<'t>(&'t self, text: &'t str) -> impl Iterator<Item = &'t str> {
        self.pattern.find_iter(text).map(|m| m.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_single_chars_and_punctuation() {
        let tokenizer = RegexTokenizer::new().unwrap();
        let tokens: Vec<&str> = tokenizer.tokenize("i can't do it, u know").collect();
        assert_eq!(tokens, vec!["can", "do", "it", "know"]);
    }

    #[test]
    fn test_unicode_word_characters() {
        let tokenizer = RegexTokenizer::new().unwrap();
        let tokens: Vec<&str> = tokenizer.tokenize("ÉCOLE_42 café!").collect();
        assert_eq!(tokens, vec!["ÉCOLE_42", "café"]);
    }
}
