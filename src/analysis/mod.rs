//! Text analysis used by the feature extractor.
//!
//! ```text
//! Raw Text → RegexTokenizer → lowercase → English stop words → terms
//! ```

pub mod analyzer;
pub mod stop_words;
pub mod tokenizer;

pub use analyzer::{Analyzer, StandardAnalyzer};
pub use tokenizer::RegexTokenizer;
