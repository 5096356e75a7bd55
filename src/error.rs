//! Error types for the comment-risk library.
//!
//! All fallible operations return [`RiskError`] through the crate-wide
//! [`Result`] alias. Input errors (missing columns, empty datasets) and
//! training errors (degenerate label distributions) are distinct variants so
//! callers can decide which stage to abort.
//!
//! # Examples
//!
//! ```
//! use comment_risk::error::{Result, RiskError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(RiskError::missing_column("Comment"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for comment-risk operations.
#[derive(Error, Debug)]
pub enum RiskError {
    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV reading or writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required column is absent from the input dataset
    #[error("Missing column: the dataset must contain a '{0}' column")]
    MissingColumn(String),

    /// The input dataset has no records
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// A label value is not one of the tier names
    #[error("Invalid label '{value}' at row {row}")]
    InvalidLabel { value: String, row: usize },

    /// Training data does not contain enough distinct tiers
    #[error("Training data needs at least 2 distinct tiers, found {found}")]
    InsufficientClasses { found: usize },

    /// Two aligned sequences have different lengths
    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A feature vector does not match the fitted dimensionality
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The dataset cannot be split into non-empty train and test parts
    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    /// The keyword vocabulary is malformed
    #[error("Invalid vocabulary: {0}")]
    InvalidVocabulary(String),

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A model or vectorizer was used before fitting
    #[error("Not fitted: {0}")]
    NotFitted(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Analysis-related errors (tokenization, filtering)
    #[error("Analysis error: {0}")]
    Analysis(String),
}

/// Result type alias for operations that may fail with RiskError.
pub type Result<T> = std::result::Result<T, RiskError>;

impl RiskError {
    /// Create a new missing column error.
    pub fn missing_column<S: Into<String>>(column: S) -> Self {
        RiskError::MissingColumn(column.into())
    }

    /// Create a new empty dataset error.
    pub fn empty_dataset<S: Into<String>>(msg: S) -> Self {
        RiskError::EmptyDataset(msg.into())
    }

    /// Create a new invalid split error.
    pub fn invalid_split<S: Into<String>>(msg: S) -> Self {
        RiskError::InvalidSplit(msg.into())
    }

    /// Create a new invalid vocabulary error.
    pub fn invalid_vocabulary<S: Into<String>>(msg: S) -> Self {
        RiskError::InvalidVocabulary(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        RiskError::InvalidConfig(msg.into())
    }

    /// Create a new not fitted error.
    pub fn not_fitted<S: Into<String>>(msg: S) -> Self {
        RiskError::NotFitted(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        RiskError::InvalidOperation(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        RiskError::Analysis(msg.into())
    }

    /// Check whether this error is an input/configuration error, as opposed
    /// to an I/O or serialization failure.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RiskError::MissingColumn(_)
                | RiskError::EmptyDataset(_)
                | RiskError::InvalidLabel { .. }
                | RiskError::InsufficientClasses { .. }
                | RiskError::InvalidSplit(_)
                | RiskError::InvalidVocabulary(_)
                | RiskError::InvalidConfig(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = RiskError::missing_column("Comment");
        assert_eq!(
            error.to_string(),
            "Missing column: the dataset must contain a 'Comment' column"
        );

        let error = RiskError::InsufficientClasses { found: 1 };
        assert_eq!(
            error.to_string(),
            "Training data needs at least 2 distinct tiers, found 1"
        );

        let error = RiskError::invalid_config("test_size must be in (0, 1)");
        assert_eq!(
            error.to_string(),
            "Invalid configuration: test_size must be in (0, 1)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let risk_error = RiskError::from(io_error);

        match risk_error {
            RiskError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_input_error_classification() {
        assert!(RiskError::empty_dataset("no rows").is_input_error());
        assert!(RiskError::InsufficientClasses { found: 0 }.is_input_error());
        assert!(!RiskError::not_fitted("vectorizer").is_input_error());
    }
}
