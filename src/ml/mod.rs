//! Supervised tier classification.
//!
//! A [`TfIdfVectorizer`] turns comment text into sparse feature vectors, a
//! [`LogisticRegression`] learns to predict tiers from them, and a
//! [`ClassificationReport`] summarizes predictions on held-out data.

pub mod classifier;
pub mod logistic;
pub mod metrics;
pub mod tfidf;

pub use classifier::TierClassifier;
pub use logistic::{ClassifierConfig, LogisticRegression, ModelMetadata, TrainingStats};
pub use metrics::{AverageMetrics, ClassMetrics, ClassificationReport};
pub use tfidf::{SparseVector, TfIdfVectorizer};
