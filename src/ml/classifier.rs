//! Tier classifier trait definition.

use crate::error::Result;
use crate::ml::tfidf::SparseVector;
use crate::scoring::tier::Tier;

/// A supervised classifier mapping feature vectors to risk tiers.
///
/// Implementations are fitted on vectorized training examples and then
/// predict one tier per vector.
pub trait TierClassifier: Send + Sync {
    /// Statistics produced by a training run.
    type Stats;

    /// Fit the classifier on aligned feature vectors and tiers.
    fn fit(&mut self, features: &[SparseVector], tiers: &[Tier]) -> Result<Self::Stats>;

    /// Predict the tier of a single vector.
    fn predict_one(&self, features: &SparseVector) -> Result<Tier>;

    /// Predict one tier per vector, in order.
    fn predict(&self, features: &[SparseVector]) -> Result<Vec<Tier>> {
        features.iter().map(|f| self.predict_one(f)).collect()
    }

    /// Check if the classifier has been fitted.
    fn is_trained(&self) -> bool;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;
}
