//! Analyzers turn raw text into the terms counted by the vectorizer.
//!
//! ```
//! use comment_risk::analysis::{Analyzer, StandardAnalyzer};
//!
//! let analyzer = StandardAnalyzer::new().unwrap();
//! assert_eq!(analyzer.analyze("The quick brown fox"), vec!["quick", "brown", "fox"]);
//! ```

use crate::analysis::stop_words::is_english_stop_word;
use crate::analysis::tokenizer::RegexTokenizer;
use crate::error::Result;

/// Converts a document into terms, in order of appearance.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Vec<String>;

    /// Short name for debug output.
    fn name(&self) -> &'static str;
}

/// Regex tokens, lowercased, English stop words removed.
#[derive(Clone, Debug)]
pub struct StandardAnalyzer {
    tokenizer: RegexTokenizer,
}

impl StandardAnalyzer {
    pub fn new() -> Result<Self> {
        Ok(StandardAnalyzer {
            tokenizer: RegexTokenizer::new()?,
        })
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, text: &str) -> Vec<String> {
        self.tokenizer
            .tokenize(text)
            .map(str::to_lowercase)
            .filter(|term| !is_english_stop_word(term))
            .collect()
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}
