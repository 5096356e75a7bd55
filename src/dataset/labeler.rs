//! Dataset labeler.
//!
//! Applies the [`LexicalScorer`] to the text column of every record and pairs
//! each record with its [`ScoringResult`]. The input dataset is never
//! modified; the three derived columns exist only on the [`LabeledDataset`].

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::record::{CommentDataset, CommentRecord};
use crate::error::{Result, RiskError};
use crate::scoring::scorer::{LexicalScorer, ScoringResult};
use crate::scoring::tier::Tier;

/// Column holding the numeric score in labeled output.
pub const SCORE_COLUMN: &str = "Score";

/// Column holding the tier name in labeled output.
pub const STATUS_COLUMN: &str = "Status Level";

/// Column holding the comma-separated evidence in labeled output.
pub const KEYWORDS_COLUMN: &str = "Triggered Keywords";

/// Default name of the free-text column.
pub const DEFAULT_TEXT_COLUMN: &str = "Comment";

/// Labels every record of a dataset with a score, tier and evidence.
#[derive(Debug, Clone)]
pub struct DatasetLabeler {
    scorer: LexicalScorer,
    text_column: String,
}

impl DatasetLabeler {
    /// Create a labeler reading the default `Comment` column.
    pub fn new(scorer: LexicalScorer) -> Self {
        Self::with_text_column(scorer, DEFAULT_TEXT_COLUMN)
    }

    /// Create a labeler reading a custom text column.
    pub fn with_text_column<S: Into<String>>(scorer: LexicalScorer, text_column: S) -> Self {
        DatasetLabeler {
            scorer,
            text_column: text_column.into(),
        }
    }

    /// The scorer applied to each record.
    pub fn scorer(&self) -> &LexicalScorer {
        &self.scorer
    }

    /// The column scored by this labeler.
    pub fn text_column(&self) -> &str {
        &self.text_column
    }

    /// Label every record in order.
    pub fn label(&self, dataset: &CommentDataset) -> Result<LabeledDataset> {
        if !dataset.has_column(&self.text_column) {
            return Err(RiskError::missing_column(self.text_column.as_str()));
        }
        if dataset.is_empty() {
            return Err(RiskError::empty_dataset("no comments to label"));
        }

        let entries: Vec<(CommentRecord, ScoringResult)> = dataset
            .records()
            .iter()
            .map(|record| {
                let result = match record.get_field(&self.text_column) {
                    Some(value) => self.scorer.score_value(value),
                    None => ScoringResult::empty(),
                };
                (record.clone(), result)
            })
            .collect();

        let labeled = LabeledDataset {
            columns: dataset.columns().to_vec(),
            text_column: self.text_column.clone(),
            entries,
        };

        let counts = labeled.tier_counts();
        log::info!(
            "Labeled {} comments: {} Safe, {} Suspicious, {} Dangerous",
            labeled.len(),
            counts.get(&Tier::Safe).copied().unwrap_or(0),
            counts.get(&Tier::Suspicious).copied().unwrap_or(0),
            counts.get(&Tier::Dangerous).copied().unwrap_or(0),
        );

        Ok(labeled)
    }
}

/// Records paired with their scoring results, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct LabeledDataset {
    columns: Vec<String>,
    text_column: String,
    entries: Vec<(CommentRecord, ScoringResult)>,
}

impl LabeledDataset {
    /// Source columns of the input dataset.
    pub fn source_columns(&self) -> &[String] {
        &self.columns
    }

    /// The column that was scored.
    pub fn text_column(&self) -> &str {
        &self.text_column
    }

    /// Output columns: source columns followed by `Score`, `Status Level` and
    /// `Triggered Keywords`. A source column with one of those names is
    /// replaced by the derived value.
    pub fn output_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self
            .columns
            .iter()
            .filter(|c| !is_derived_column(c))
            .cloned()
            .collect();
        columns.extend(
            [SCORE_COLUMN, STATUS_COLUMN, KEYWORDS_COLUMN]
                .iter()
                .map(|c| c.to_string()),
        );
        columns
    }

    /// Render every entry as a row of cells aligned with
    /// [`output_columns`](Self::output_columns).
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let source: Vec<&String> = self
            .columns
            .iter()
            .filter(|c| !is_derived_column(c))
            .collect();

        self.entries
            .iter()
            .map(|(record, result)| {
                let mut row: Vec<String> = source
                    .iter()
                    .map(|column| {
                        record
                            .cell_text(column)
                            .map(|cell| cell.into_owned())
                            .unwrap_or_default()
                    })
                    .collect();
                row.push(result.score.to_string());
                row.push(result.tier.to_string());
                row.push(result.evidence_string());
                row
            })
            .collect()
    }

    /// Entries in input order.
    pub fn entries(&self) -> &[(CommentRecord, ScoringResult)] {
        &self.entries
    }

    /// Scoring results in input order.
    pub fn results(&self) -> impl Iterator<Item = &ScoringResult> {
        self.entries.iter().map(|(_, result)| result)
    }

    /// `(text, tier)` pairs for training. Records without text are skipped
    /// and the count is logged.
    pub fn training_examples(&self) -> Vec<(String, Tier)> {
        let examples: Vec<(String, Tier)> = self
            .entries
            .iter()
            .filter_map(|(record, result)| {
                record
                    .get_text(&self.text_column)
                    .map(|text| (text.to_string(), result.tier))
            })
            .collect();

        let dropped = self.entries.len() - examples.len();
        if dropped > 0 {
            log::warn!(
                "Dropped {dropped} records with no text in '{}' from training",
                self.text_column
            );
        }

        examples
    }

    /// Number of records per tier. Every tier is present.
    pub fn tier_counts(&self) -> BTreeMap<Tier, usize> {
        let mut counts: BTreeMap<Tier, usize> = Tier::ALL.iter().map(|t| (*t, 0)).collect();
        for result in self.results() {
            *counts.entry(result.tier).or_insert(0) += 1;
        }
        counts
    }

    /// Number of labeled records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no labeled records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_derived_column(column: &str) -> bool {
    column == SCORE_COLUMN || column == STATUS_COLUMN || column == KEYWORDS_COLUMN
}
