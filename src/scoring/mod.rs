//! Keyword-based risk scoring.
//!
//! The scorer sums the weights of the vocabulary terms found in a comment and
//! maps the total onto a [`Tier`]. It is the source of the labels the
//! classifier is later trained on.

pub mod scorer;
pub mod tier;
pub mod vocabulary;

pub use scorer::{LexicalScorer, ScoringResult};
pub use tier::{DANGEROUS_THRESHOLD, SUSPICIOUS_THRESHOLD, Tier};
pub use vocabulary::{DEFAULT_KEYWORDS, Vocabulary, VocabularyEntry};
