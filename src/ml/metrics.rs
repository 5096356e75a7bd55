//! Classification report for held-out predictions.
//!
//! Per-tier precision, recall, F1 and support, computed from a confusion
//! matrix. Every tier gets a row even when it never occurs, and divisions by
//! zero yield 0.0.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};
use crate::scoring::tier::Tier;

/// Precision, recall and F1 for a single tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub tier: Tier,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Number of true instances of the tier.
    pub support: usize,
}

/// An averaged metric row.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// Evaluation report comparing true and predicted tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// One row per tier, ascending.
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    /// Unweighted mean over all tiers.
    pub macro_avg: AverageMetrics,
    /// Mean over all tiers weighted by support.
    pub weighted_avg: AverageMetrics,
    /// `confusion[true][predicted]`, indexed by [`Tier::index`].
    pub confusion: [[usize; 3]; 3],
}

impl ClassificationReport {
    /// Build a report from aligned true and predicted tiers.
    pub fn generate(y_true: &[Tier], y_pred: &[Tier]) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(RiskError::LengthMismatch {
                expected: y_true.len(),
                actual: y_pred.len(),
            });
        }

        let mut confusion = [[0usize; 3]; 3];
        for (t, p) in y_true.iter().zip(y_pred) {
            confusion[t.index()][p.index()] += 1;
        }

        let total = y_true.len();
        let correct: usize = (0..3).map(|i| confusion[i][i]).sum();
        let accuracy = ratio(correct, total);

        let classes: Vec<ClassMetrics> = Tier::ALL
            .iter()
            .map(|&tier| {
                let i = tier.index();
                let tp = confusion[i][i];
                let predicted: usize = (0..3).map(|row| confusion[row][i]).sum();
                let support: usize = confusion[i].iter().sum();

                let precision = ratio(tp, predicted);
                let recall = ratio(tp, support);
                let f1_score = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };

                ClassMetrics {
                    tier,
                    precision,
                    recall,
                    f1_score,
                    support,
                }
            })
            .collect();

        let n_classes = classes.len() as f64;
        let macro_avg = AverageMetrics {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / n_classes,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / n_classes,
            f1_score: classes.iter().map(|c| c.f1_score).sum::<f64>() / n_classes,
            support: total,
        };

        let weighted = |metric: fn(&ClassMetrics) -> f64| -> f64 {
            if total == 0 {
                return 0.0;
            }
            classes
                .iter()
                .map(|c| metric(c) * c.support as f64)
                .sum::<f64>()
                / total as f64
        };
        let weighted_avg = AverageMetrics {
            precision: weighted(|c| c.precision),
            recall: weighted(|c| c.recall),
            f1_score: weighted(|c| c.f1_score),
            support: total,
        };

        Ok(ClassificationReport {
            classes,
            accuracy,
            macro_avg,
            weighted_avg,
            confusion,
        })
    }

    /// Metrics row of a tier.
    pub fn class(&self, tier: Tier) -> &ClassMetrics {
        &self.classes[tier.index()]
    }

    /// Total number of evaluated examples.
    pub fn total_support(&self) -> usize {
        self.macro_avg.support
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64
    } else {
        0.0
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>12}  {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for class in &self.classes {
            writeln!(
                f,
                "{:>12}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                class.tier.as_str(),
                class.precision,
                class.recall,
                class.f1_score,
                class.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>12}  {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.total_support()
        )?;
        for (name, avg) in [
            ("macro avg", &self.macro_avg),
            ("weighted avg", &self.weighted_avg),
        ] {
            writeln!(
                f,
                "{:>12}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, avg.precision, avg.recall, avg.f1_score, avg.support
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::scoring::tier::Tier::{Dangerous, Safe, Suspicious};

    #[test]
    fn test_perfect_predictions() {
        let tiers = vec![Safe, Suspicious, Dangerous, Dangerous];
        let report = ClassificationReport::generate(&tiers, &tiers).unwrap();

        assert!((report.accuracy - 1.0).abs() < 1e-9);
        for class in &report.classes {
            assert!((class.f1_score - 1.0).abs() < 1e-9);
        }
        assert_eq!(report.class(Dangerous).support, 2);
    }

    #[test]
    fn test_mixed_predictions() {
        let y_true = vec![Safe, Safe, Safe, Suspicious, Dangerous, Dangerous];
        let y_pred = vec![Safe, Safe, Suspicious, Suspicious, Dangerous, Safe];
        let report = ClassificationReport::generate(&y_true, &y_pred).unwrap();

        let safe = report.class(Safe);
        assert!((safe.precision - 2.0 / 3.0).abs() < 1e-9);
        assert!((safe.recall - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(safe.support, 3);

        let suspicious = report.class(Suspicious);
        assert!((suspicious.precision - 0.5).abs() < 1e-9);
        assert!((suspicious.recall - 1.0).abs() < 1e-9);

        let dangerous = report.class(Dangerous);
        assert!((dangerous.precision - 1.0).abs() < 1e-9);
        assert!((dangerous.recall - 0.5).abs() < 1e-9);

        assert!((report.accuracy - 4.0 / 6.0).abs() < 1e-9);
        assert_eq!(report.confusion[Dangerous.index()][Safe.index()], 1);

        let expected_weighted_recall = (3.0 * (2.0 / 3.0) + 1.0 + 2.0 * 0.5) / 6.0;
        assert!((report.weighted_avg.recall - expected_weighted_recall).abs() < 1e-9);
    }

    #[test]
    fn test_absent_tier_gets_zero_row() {
        let y_true = vec![Safe, Dangerous];
        let y_pred = vec![Safe, Dangerous];
        let report = ClassificationReport::generate(&y_true, &y_pred).unwrap();

        let suspicious = report.class(Suspicious);
        assert_eq!(suspicious.support, 0);
        assert_eq!(suspicious.precision, 0.0);
        assert_eq!(suspicious.f1_score, 0.0);
        assert!((report.macro_avg.f1_score - 2.0 / 3.0).abs() < 1e-9);
        assert!((report.weighted_avg.f1_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input() {
        let report = ClassificationReport::generate(&[], &[]).unwrap();
        assert_eq!(report.accuracy, 0.0);
        assert_eq!(report.total_support(), 0);
        assert_eq!(report.weighted_avg, AverageMetrics::default());
        assert_eq!(report.classes.len(), 3);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            ClassificationReport::generate(&[Safe], &[]),
            Err(RiskError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_display_layout() {
        let y_true = vec![Safe, Safe, Dangerous, Suspicious];
        let y_pred = vec![Safe, Dangerous, Dangerous, Suspicious];
        let report = ClassificationReport::generate(&y_true, &y_pred).unwrap();

        let expected = [
            "              precision    recall  f1-score   support",
            "",
            "        Safe       1.00      0.50      0.67         2",
            "  Suspicious       1.00      1.00      1.00         1",
            "   Dangerous       0.50      1.00      0.67         1",
            "",
            "    accuracy                           0.75         4",
            "   macro avg       0.83      0.83      0.78         4",
            "weighted avg       0.88      0.75      0.75         4",
            "",
        ]
        .join("\n");
        assert_eq!(report.to_string(), expected);
    }
}
