//! Seeded train/test split.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{Result, RiskError};

/// Default fraction of examples held out for evaluation.
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Default shuffle seed.
pub const DEFAULT_SEED: u64 = 42;

/// Split `items` into `(train, test)` after a seeded shuffle.
///
/// The test part holds `ceil(test_size * n)` items and the train part the
/// rest. Both parts must be non-empty. The same seed always produces the same
/// partition.
pub fn train_test_split<T: Clone>(
    items: &[T],
    test_size: f64,
    seed: u64,
) -> Result<(Vec<T>, Vec<T>)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(RiskError::invalid_split(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }

    let n = items.len();
    let n_test = (test_size * n as f64).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(RiskError::invalid_split(format!(
            "{n} examples with test_size {test_size} leaves {n_train} for training and {n_test} for testing"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test = indices[..n_test].iter().map(|&i| items[i].clone()).collect();
    let train = indices[n_test..].iter().map(|&i| items[i].clone()).collect();

    log::debug!("Split {n} examples into {n_train} train and {n_test} test (seed {seed})");

    Ok((train, test))
}
