//! # comment-risk
//!
//! Keyword risk scoring and supervised tier classification for public video
//! comments.
//!
//! ## Features
//!
//! - Weighted keyword vocabulary with whole-word, case-insensitive matching
//! - Three ordinal risk tiers: Safe, Suspicious, Dangerous
//! - CSV input/output of labeled comment datasets
//! - TF-IDF feature extraction over regex tokens with English stop words removed
//! - Multinomial logistic regression trained on the heuristic labels
//! - Classification report on a seeded held-out split
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use comment_risk::dataset::{CommentDataset, DatasetLabeler};
//! use comment_risk::scoring::{LexicalScorer, Tier, Vocabulary};
//!
//! let scorer = LexicalScorer::new(Arc::new(Vocabulary::default_keywords().unwrap()));
//! let labeler = DatasetLabeler::new(scorer);
//!
//! let dataset = CommentDataset::from_texts("Comment", &["Add me on Discord", "Great video!"]);
//! let labeled = labeler.label(&dataset).unwrap();
//!
//! let tiers: Vec<Tier> = labeled.results().map(|r| r.tier).collect();
//! assert_eq!(tiers, vec![Tier::Dangerous, Tier::Safe]);
//! ```

pub mod analysis;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod ml;
pub mod pipeline;
pub mod scoring;

pub mod prelude {
    pub use crate::dataset::{CommentDataset, CommentRecord, DatasetLabeler, LabeledDataset};
    pub use crate::error::{Result, RiskError};
    pub use crate::ml::{ClassificationReport, LogisticRegression, TfIdfVectorizer, TierClassifier};
    pub use crate::pipeline::{Pipeline, PipelineConfig};
    pub use crate::scoring::{LexicalScorer, ScoringResult, Tier, Vocabulary};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
