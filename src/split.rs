//! Seeded train/test partitioning of a dataset.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{DatasetError, DatasetResult};

/// Split parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Fraction of samples held out for testing.
    pub test_size: f64,
    /// Shuffle seed; the same seed and dataset give the same split.
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_size: 0.25,
            seed: 42,
        }
    }
}

/// Disjoint training and test sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

/// Shuffle `dataset` with `seed` and hold out `ceil(test_size * n)` samples.
///
/// Fails with [`DatasetError::InvalidSplit`] unless `test_size` lies in
/// (0, 1) and both sides end up non-empty.
pub fn train_test_split(dataset: Dataset, test_size: f64, seed: u64) -> DatasetResult<Split> {
    let n = dataset.len();
    let invalid = || DatasetError::InvalidSplit {
        test_size,
        samples: n,
    };
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(invalid());
    }
    let n_test = (test_size * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(invalid());
    }

    let mut samples = dataset.into_samples();
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);
    let train = samples.split_off(n_test);

    tracing::info!(train = train.len(), test = samples.len(), seed, "split dataset");
    Ok(Split {
        train: Dataset::new(train),
        test: Dataset::new(samples),
    })
}

impl Split {
    /// Split with the parameters from `config`.
    pub fn from_config(dataset: Dataset, config: &SplitConfig) -> DatasetResult<Self> {
        train_test_split(dataset, config.test_size, config.seed)
    }
}
