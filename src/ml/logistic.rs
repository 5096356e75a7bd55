//! Multinomial logistic regression.
//!
//! Minimizes the mean cross-entropy of a softmax model plus an L2 penalty on
//! the weights, scaled so that `c` plays the role of an inverse
//! regularization strength:
//!
//! ```text
//! loss = (1/n) Σ -ln p(y_i | x_i) + ||W||² / (2 c n)
//! ```
//!
//! Optimization is full-batch gradient descent bounded by `max_iter`. The
//! intercepts are not penalized.

use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};
use crate::ml::classifier::TierClassifier;
use crate::ml::tfidf::SparseVector;
use crate::scoring::tier::Tier;

/// Hyperparameters for [`LogisticRegression`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Maximum number of gradient descent iterations.
    pub max_iter: usize,
    /// Convergence threshold on the largest gradient component.
    pub tol: f64,
    /// Inverse regularization strength.
    pub c: f64,
    /// Gradient descent step size.
    pub learning_rate: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            max_iter: 1000,
            tol: 1e-4,
            c: 1.0,
            learning_rate: 1.0,
        }
    }
}

impl ClassifierConfig {
    /// Check that every value is in range.
    pub fn validate(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(RiskError::invalid_config("max_iter must be at least 1"));
        }
        if !(self.tol > 0.0) {
            return Err(RiskError::invalid_config(format!(
                "tol must be positive, got {}",
                self.tol
            )));
        }
        if !(self.c > 0.0) {
            return Err(RiskError::invalid_config(format!(
                "c must be positive, got {}",
                self.c
            )));
        }
        if !(self.learning_rate > 0.0) {
            return Err(RiskError::invalid_config(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

/// Training statistics of one fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Training loss per evaluated iteration.
    pub training_losses: Vec<f64>,
    /// Number of gradient evaluations performed.
    pub iterations: usize,
    /// Training time in milliseconds.
    pub training_time_ms: u64,
    /// Loss of the kept parameters.
    pub final_training_loss: f64,
    /// Largest gradient component at the kept parameters.
    pub final_max_gradient: f64,
    /// Whether the gradient fell below `tol` within `max_iter`.
    pub converged: bool,
}

/// Descriptive metadata of a trained model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model name/identifier.
    pub name: String,
    /// Library version that trained the model.
    pub version: String,
    /// Training timestamp.
    pub trained_at: chrono::DateTime<chrono::Utc>,
    /// Number of training examples used.
    pub training_examples: usize,
    /// Number of input features.
    pub n_features: usize,
    /// Tiers present in the training data, ascending.
    pub classes: Vec<Tier>,
    /// Model hyperparameters.
    pub hyperparameters: HashMap<String, f64>,
}

/// Multinomial logistic regression over sparse TF-IDF vectors.
///
/// # Examples
///
/// ```
/// use comment_risk::ml::classifier::TierClassifier;
/// use comment_risk::ml::logistic::LogisticRegression;
/// use comment_risk::ml::tfidf::SparseVector;
/// use comment_risk::scoring::Tier;
///
/// let features = vec![
///     SparseVector::from_pairs(2, vec![(0, 1.0)]).unwrap(),
///     SparseVector::from_pairs(2, vec![(1, 1.0)]).unwrap(),
/// ];
/// let tiers = vec![Tier::Safe, Tier::Dangerous];
///
/// let mut model = LogisticRegression::default();
/// model.fit(&features, &tiers).unwrap();
/// assert_eq!(model.predict(&features).unwrap(), tiers);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogisticRegression {
    config: ClassifierConfig,
    model: Option<FittedModel>,
}

#[derive(Debug, Clone)]
struct FittedModel {
    /// Classes in ascending tier order; row `k` of the weights belongs to
    /// `classes[k]`.
    classes: Vec<Tier>,
    weights: Vec<Vec<f64>>,
    biases: Vec<f64>,
    n_features: usize,
    stats: TrainingStats,
    metadata: ModelMetadata,
}

/// Current parameters with their loss and gradient.
struct Evaluation {
    loss: f64,
    grad_weights: Vec<Vec<f64>>,
    grad_biases: Vec<f64>,
    max_gradient: f64,
}

impl LogisticRegression {
    /// Create an unfitted model with the given hyperparameters.
    pub fn new(config: ClassifierConfig) -> Self {
        LogisticRegression {
            config,
            model: None,
        }
    }

    /// The hyperparameters of this model.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classes seen during training, ascending.
    pub fn classes(&self) -> Option<&[Tier]> {
        self.model.as_ref().map(|m| m.classes.as_slice())
    }

    /// Statistics of the last fit.
    pub fn training_stats(&self) -> Option<&TrainingStats> {
        self.model.as_ref().map(|m| &m.stats)
    }

    /// Metadata of the last fit.
    pub fn metadata(&self) -> Option<&ModelMetadata> {
        self.model.as_ref().map(|m| &m.metadata)
    }

    /// Class probabilities for one vector, ordered like [`classes`](Self::classes).
    pub fn predict_proba(&self, features: &SparseVector) -> Result<Vec<(Tier, f64)>> {
        let model = self.fitted()?;
        if features.dimension() != model.n_features {
            return Err(RiskError::DimensionMismatch {
                expected: model.n_features,
                actual: features.dimension(),
            });
        }

        let probs = softmax(&logits(&model.weights, &model.biases, features));
        Ok(model.classes.iter().copied().zip(probs).collect())
    }

    fn fitted(&self) -> Result<&FittedModel> {
        self.model
            .as_ref()
            .ok_or_else(|| RiskError::not_fitted("logistic regression has not been trained"))
    }

    fn evaluate(
        weights: &[Vec<f64>],
        biases: &[f64],
        features: &[SparseVector],
        targets: &[usize],
        reg: f64,
    ) -> Evaluation {
        let n = features.len() as f64;
        let k = biases.len();
        let d = weights.first().map(Vec::len).unwrap_or(0);

        let mut loss = 0.0;
        let mut grad_weights = vec![vec![0.0; d]; k];
        let mut grad_biases = vec![0.0; k];

        for (x, &y) in features.iter().zip(targets) {
            let probs = softmax(&logits(weights, biases, x));
            loss -= probs[y].max(f64::MIN_POSITIVE).ln();

            for (class, p) in probs.iter().enumerate() {
                let residual = p - if class == y { 1.0 } else { 0.0 };
                grad_biases[class] += residual / n;
                for (j, v) in x.iter() {
                    grad_weights[class][j] += residual * v / n;
                }
            }
        }
        loss /= n;

        let mut max_gradient: f64 = grad_biases.iter().fold(0.0, |m, g| m.max(g.abs()));
        for (grad_row, row) in grad_weights.iter_mut().zip(weights) {
            for (g, w) in grad_row.iter_mut().zip(row) {
                loss += reg * w * w / 2.0;
                *g += reg * w;
                max_gradient = max_gradient.max(g.abs());
            }
        }

        Evaluation {
            loss,
            grad_weights,
            grad_biases,
            max_gradient,
        }
    }
}

impl TierClassifier for LogisticRegression {
    type Stats = TrainingStats;

    fn fit(&mut self, features: &[SparseVector], tiers: &[Tier]) -> Result<TrainingStats> {
        self.config.validate()?;

        if features.len() != tiers.len() {
            return Err(RiskError::LengthMismatch {
                expected: tiers.len(),
                actual: features.len(),
            });
        }
        if features.is_empty() {
            return Err(RiskError::empty_dataset("no training examples"));
        }

        let n_features = features[0].dimension();
        if let Some(bad) = features.iter().find(|f| f.dimension() != n_features) {
            return Err(RiskError::DimensionMismatch {
                expected: n_features,
                actual: bad.dimension(),
            });
        }

        let classes: Vec<Tier> = tiers.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        if classes.len() < 2 {
            return Err(RiskError::InsufficientClasses {
                found: classes.len(),
            });
        }

        let targets: Vec<usize> = tiers
            .iter()
            .map(|t| classes.iter().position(|c| c == t).unwrap_or(0))
            .collect();

        let start_time = Instant::now();
        let k = classes.len();
        let reg = 1.0 / (self.config.c * features.len() as f64);
        let lr = self.config.learning_rate;

        let mut weights = vec![vec![0.0; n_features]; k];
        let mut biases = vec![0.0; k];
        let mut best = (f64::INFINITY, weights.clone(), biases.clone(), f64::INFINITY);
        let mut training_losses = Vec::new();
        let mut converged = false;

        // One evaluation per iteration plus one for the final step's result
        for iteration in 0..=self.config.max_iter {
            let eval = Self::evaluate(&weights, &biases, features, &targets, reg);
            training_losses.push(eval.loss);

            if eval.loss < best.0 {
                best = (eval.loss, weights.clone(), biases.clone(), eval.max_gradient);
            }

            if eval.max_gradient < self.config.tol {
                converged = true;
                best = (eval.loss, weights.clone(), biases.clone(), eval.max_gradient);
                log::debug!("Converged after {iteration} iterations (loss {:.6})", eval.loss);
                break;
            }
            if iteration == self.config.max_iter {
                break;
            }
            if iteration % 100 == 0 {
                log::debug!(
                    "Iteration {iteration}: loss {:.6}, max gradient {:.6}",
                    eval.loss,
                    eval.max_gradient
                );
            }

            for (row, grad_row) in weights.iter_mut().zip(&eval.grad_weights) {
                for (w, g) in row.iter_mut().zip(grad_row) {
                    *w -= lr * g;
                }
            }
            for (b, g) in biases.iter_mut().zip(&eval.grad_biases) {
                *b -= lr * g;
            }
        }

        if !converged {
            log::warn!(
                "Logistic regression did not converge within {} iterations (max gradient {:.6} > tol {}); keeping the lowest-loss parameters",
                self.config.max_iter,
                best.3,
                self.config.tol
            );
        }

        let (final_loss, weights, biases, final_max_gradient) = best;
        let stats = TrainingStats {
            iterations: training_losses.len(),
            training_losses,
            training_time_ms: start_time.elapsed().as_millis() as u64,
            final_training_loss: final_loss,
            final_max_gradient,
            converged,
        };

        let hyperparameters = HashMap::from([
            ("max_iter".to_string(), self.config.max_iter as f64),
            ("tol".to_string(), self.config.tol),
            ("c".to_string(), self.config.c),
            ("learning_rate".to_string(), self.config.learning_rate),
        ]);
        let metadata = ModelMetadata {
            name: self.name().to_string(),
            version: crate::VERSION.to_string(),
            trained_at: chrono::Utc::now(),
            training_examples: features.len(),
            n_features,
            classes: classes.clone(),
            hyperparameters,
        };

        log::info!(
            "Trained {} on {} examples, {} features, {} classes (loss {:.4})",
            metadata.name,
            features.len(),
            n_features,
            k,
            stats.final_training_loss
        );

        self.model = Some(FittedModel {
            classes,
            weights,
            biases,
            n_features,
            stats: stats.clone(),
            metadata,
        });

        Ok(stats)
    }

    fn predict_one(&self, features: &SparseVector) -> Result<Tier> {
        let probs = self.predict_proba(features)?;

        // Strict comparison keeps the first, lowest, tier on exact ties
        let mut best = probs[0];
        for &(tier, p) in &probs[1..] {
            if p > best.1 {
                best = (tier, p);
            }
        }
        Ok(best.0)
    }

    fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}

fn logits(weights: &[Vec<f64>], biases: &[f64], x: &SparseVector) -> Vec<f64> {
    weights
        .iter()
        .zip(biases)
        .map(|(row, b)| x.dot(row) + b)
        .collect()
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_hot(dimension: usize, index: usize) -> SparseVector {
        SparseVector::from_pairs(dimension, vec![(index, 1.0)]).unwrap()
    }

    fn separable() -> (Vec<SparseVector>, Vec<Tier>) {
        let features = vec![
            one_hot(3, 0),
            one_hot(3, 0),
            one_hot(3, 1),
            one_hot(3, 1),
            one_hot(3, 2),
            one_hot(3, 2),
        ];
        let tiers = vec![
            Tier::Safe,
            Tier::Safe,
            Tier::Suspicious,
            Tier::Suspicious,
            Tier::Dangerous,
            Tier::Dangerous,
        ];
        (features, tiers)
    }

    #[test]
    fn test_fit_and_predict_separable() {
        let (features, tiers) = separable();
        let mut model = LogisticRegression::default();
        let stats = model.fit(&features, &tiers).unwrap();

        assert!(stats.converged);
        assert!(stats.final_max_gradient < 1e-4);
        assert_eq!(model.predict(&features).unwrap(), tiers);
        assert_eq!(
            model.classes().unwrap(),
            &[Tier::Safe, Tier::Suspicious, Tier::Dangerous]
        );
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (features, tiers) = separable();
        let mut model = LogisticRegression::default();
        model.fit(&features, &tiers).unwrap();

        let probs = model.predict_proba(&features[4]).unwrap();
        let total: f64 = probs.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(probs[2].0, Tier::Dangerous);
        assert!(probs[2].1 > probs[0].1);
    }

    #[test]
    fn test_loss_decreases() {
        let (features, tiers) = separable();
        let mut model = LogisticRegression::default();
        let stats = model.fit(&features, &tiers).unwrap();

        let first = stats.training_losses[0];
        assert!((first - 3.0f64.ln()).abs() < 1e-9);
        assert!(stats.final_training_loss < first);
    }

    #[test]
    fn test_tie_resolves_to_lowest_tier() {
        let features = vec![one_hot(2, 0), one_hot(2, 1)];
        let tiers = vec![Tier::Dangerous, Tier::Suspicious];
        let mut model = LogisticRegression::default();
        model.fit(&features, &tiers).unwrap();

        // Flatten the model so every class is equally likely
        if let Some(fitted) = model.model.as_mut() {
            fitted.biases = vec![0.25, 0.25];
            for row in &mut fitted.weights {
                row.fill(0.0);
            }
        }

        assert_eq!(model.classes().unwrap(), &[Tier::Suspicious, Tier::Dangerous]);
        assert_eq!(model.predict_one(&features[0]).unwrap(), Tier::Suspicious);
        assert_eq!(
            model.predict_one(&SparseVector::zeros(2)).unwrap(),
            Tier::Suspicious
        );
    }

    #[test]
    fn test_two_classes_only() {
        let features = vec![one_hot(2, 0), one_hot(2, 1)];
        let tiers = vec![Tier::Safe, Tier::Dangerous];
        let mut model = LogisticRegression::default();
        model.fit(&features, &tiers).unwrap();

        let predictions = model.predict(&features).unwrap();
        assert_eq!(predictions, tiers);
        assert!(!predictions.contains(&Tier::Suspicious));
    }

    #[test]
    fn test_non_convergence_keeps_best_parameters() {
        let (features, tiers) = separable();
        let config = ClassifierConfig {
            max_iter: 1,
            ..ClassifierConfig::default()
        };
        let mut model = LogisticRegression::new(config);
        let stats = model.fit(&features, &tiers).unwrap();

        assert!(!stats.converged);
        assert_eq!(stats.iterations, 2);
        assert!(stats.final_training_loss <= stats.training_losses[0]);
        assert!(model.is_trained());
    }

    #[test]
    fn test_input_errors() {
        let mut model = LogisticRegression::default();

        assert!(matches!(
            model.fit(&[one_hot(2, 0)], &[Tier::Safe, Tier::Safe]),
            Err(RiskError::LengthMismatch { .. })
        ));
        assert!(matches!(
            model.fit(&[one_hot(2, 0), one_hot(2, 1)], &[Tier::Safe, Tier::Safe]),
            Err(RiskError::InsufficientClasses { found: 1 })
        ));
        assert!(matches!(
            model.fit(&[one_hot(2, 0), one_hot(3, 1)], &[Tier::Safe, Tier::Dangerous]),
            Err(RiskError::DimensionMismatch { .. })
        ));
        assert!(matches!(model.fit(&[], &[]), Err(RiskError::EmptyDataset(_))));
    }

    #[test]
    fn test_predict_errors() {
        let model = LogisticRegression::default();
        assert!(matches!(
            model.predict_one(&one_hot(2, 0)),
            Err(RiskError::NotFitted(_))
        ));

        let (features, tiers) = separable();
        let mut model = LogisticRegression::default();
        model.fit(&features, &tiers).unwrap();
        assert!(matches!(
            model.predict_one(&one_hot(5, 0)),
            Err(RiskError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_metadata() {
        let (features, tiers) = separable();
        let mut model = LogisticRegression::default();
        model.fit(&features, &tiers).unwrap();

        let metadata = model.metadata().unwrap();
        assert_eq!(metadata.name, "logistic_regression");
        assert_eq!(metadata.training_examples, 6);
        assert_eq!(metadata.n_features, 3);
        assert_eq!(metadata.hyperparameters["c"], 1.0);
    }

    #[test]
    fn test_config_validation() {
        assert!(ClassifierConfig::default().validate().is_ok());
        for config in [
            ClassifierConfig { max_iter: 0, ..Default::default() },
            ClassifierConfig { tol: 0.0, ..Default::default() },
            ClassifierConfig { c: -1.0, ..Default::default() },
            ClassifierConfig { learning_rate: f64::NAN, ..Default::default() },
        ] {
            assert!(matches!(config.validate(), Err(RiskError::InvalidConfig(_))));
        }
    }
}
