//! End-to-end labeling and training pipeline.
//!
//! ```text
//! CommentDataset → DatasetLabeler → (text, tier) examples
//!     → train_test_split → TfIdfVectorizer (fit on train)
//!     → LogisticRegression (fit on train) → predict test
//!     → ClassificationReport
//! ```
//!
//! The classifier consumes `(text, tier)` examples from any source, so the
//! heuristic labels can be replaced by a hand-labeled dataset.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dataset::labeler::{DEFAULT_TEXT_COLUMN, DatasetLabeler, LabeledDataset, STATUS_COLUMN};
use crate::dataset::record::CommentDataset;
use crate::dataset::split::{DEFAULT_SEED, DEFAULT_TEST_SIZE, train_test_split};
use crate::error::{Result, RiskError};
use crate::ml::classifier::TierClassifier;
use crate::ml::logistic::{ClassifierConfig, LogisticRegression, ModelMetadata, TrainingStats};
use crate::ml::metrics::ClassificationReport;
use crate::ml::tfidf::TfIdfVectorizer;
use crate::scoring::scorer::LexicalScorer;
use crate::scoring::tier::Tier;
use crate::scoring::vocabulary::Vocabulary;

/// Configuration for a [`Pipeline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Column holding the comment text.
    pub text_column: String,
    /// Column holding the tier label when training from a labeled file.
    pub label_column: String,
    /// Fraction of examples held out for evaluation.
    pub test_size: f64,
    /// Seed for the train/test shuffle.
    pub seed: u64,
    /// Classifier hyperparameters.
    pub classifier: ClassifierConfig,
    /// JSON vocabulary file replacing the built-in keyword table.
    pub vocabulary: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            text_column: DEFAULT_TEXT_COLUMN.to_string(),
            label_column: STATUS_COLUMN.to_string(),
            test_size: DEFAULT_TEST_SIZE,
            seed: DEFAULT_SEED,
            classifier: ClassifierConfig::default(),
            vocabulary: None,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file. Missing keys take their
    /// default values.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> Result<()> {
        if self.text_column.is_empty() {
            return Err(RiskError::invalid_config("text_column must not be empty"));
        }
        if self.label_column.is_empty() {
            return Err(RiskError::invalid_config("label_column must not be empty"));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(RiskError::invalid_config(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        self.classifier.validate()
    }
}

/// Result of training and evaluating on a set of examples.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationOutcome {
    pub report: ClassificationReport,
    pub stats: TrainingStats,
    pub metadata: ModelMetadata,
    /// Number of training examples.
    pub train_size: usize,
    /// Number of held-out examples.
    pub test_size: usize,
    /// Conditions worth surfacing that did not stop the run.
    pub warnings: Vec<String>,
}

/// Result of [`Pipeline::run`].
///
/// The labeled dataset is kept even when training fails, so it can still be
/// saved.
#[derive(Debug)]
pub struct RunOutcome {
    pub labeled: LabeledDataset,
    pub evaluation: Result<EvaluationOutcome>,
}

/// Labels comments with the keyword scorer and trains a classifier on the
/// resulting tiers.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    labeler: DatasetLabeler,
}

impl Pipeline {
    /// Create a pipeline, loading the configured vocabulary or the built-in
    /// keyword table.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let vocabulary = match &config.vocabulary {
            Some(path) => Vocabulary::from_file(path)?,
            None => Vocabulary::default_keywords()?,
        };
        Self::with_vocabulary(config, Arc::new(vocabulary))
    }

    /// Create a pipeline with an explicit vocabulary.
    pub fn with_vocabulary(config: PipelineConfig, vocabulary: Arc<Vocabulary>) -> Result<Self> {
        config.validate()?;
        let labeler = DatasetLabeler::with_text_column(
            LexicalScorer::new(vocabulary),
            config.text_column.as_str(),
        );
        Ok(Pipeline { config, labeler })
    }

    /// The pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The labeler applying the keyword scorer.
    pub fn labeler(&self) -> &DatasetLabeler {
        &self.labeler
    }

    /// Label every record of the dataset.
    pub fn label(&self, dataset: &CommentDataset) -> Result<LabeledDataset> {
        self.labeler.label(dataset)
    }

    /// Split the examples, fit the vectorizer and classifier on the train
    /// part, and evaluate on the test part.
    pub fn train_and_evaluate(&self, examples: &[(String, Tier)]) -> Result<EvaluationOutcome> {
        let (train, test) = train_test_split(examples, self.config.test_size, self.config.seed)?;
        log::info!(
            "Training on {} examples, evaluating on {}",
            train.len(),
            test.len()
        );

        let mut warnings = Vec::new();

        let train_texts: Vec<&str> = train.iter().map(|(text, _)| text.as_str()).collect();
        let train_tiers: Vec<Tier> = train.iter().map(|(_, tier)| *tier).collect();
        let test_texts: Vec<&str> = test.iter().map(|(text, _)| text.as_str()).collect();
        let test_tiers: Vec<Tier> = test.iter().map(|(_, tier)| *tier).collect();

        let mut vectorizer = TfIdfVectorizer::english()?;
        let train_features = vectorizer.fit_transform(&train_texts)?;
        let test_features = vectorizer.transform_batch(&test_texts)?;

        let mut classifier = LogisticRegression::new(self.config.classifier.clone());
        let stats = classifier.fit(&train_features, &train_tiers)?;
        if !stats.converged {
            warnings.push(format!(
                "classifier did not converge within {} iterations",
                self.config.classifier.max_iter
            ));
        }

        for tier in Tier::ALL {
            if test_tiers.contains(&tier) && !train_tiers.contains(&tier) {
                let message = format!("tier {tier} appears in the test split but not in training");
                log::warn!("{message}");
                warnings.push(message);
            }
        }

        let predictions = classifier.predict(&test_features)?;
        let report = ClassificationReport::generate(&test_tiers, &predictions)?;
        log::info!("Held-out accuracy: {:.4}", report.accuracy);

        let metadata = classifier
            .metadata()
            .cloned()
            .ok_or_else(|| RiskError::not_fitted("classifier produced no metadata"))?;

        Ok(EvaluationOutcome {
            report,
            stats,
            metadata,
            train_size: train.len(),
            test_size: test.len(),
            warnings,
        })
    }

    /// Label the dataset, then train and evaluate on the heuristic labels.
    ///
    /// Labeling errors abort the run. Training errors are returned inside
    /// the outcome next to the labeled dataset.
    pub fn run(&self, dataset: &CommentDataset) -> Result<RunOutcome> {
        let labeled = self.label(dataset)?;
        let examples = labeled.training_examples();

        let evaluation = self.train_and_evaluate(&examples);
        if let Err(e) = &evaluation {
            log::error!("Training failed: {e}");
        }

        Ok(RunOutcome {
            labeled,
            evaluation,
        })
    }
}
