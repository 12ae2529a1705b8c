//! Multinomial Naive Bayes over token-count vectors.
//!
//! For each class c the model estimates a prior `P(c) = count(c) / total`
//! and, for each vocabulary column v, a Laplace-smoothed conditional
//!
//! ```text
//! P(v|c) = (count(v, c) + α) / (Σ_v' count(v', c) + α·|V|)
//! ```
//!
//! Scores are kept in log space: a row's joint log likelihood for class c is
//! `log P(c) + Σ_v x_v · log P(v|c)`. Fitting is a single deterministic pass.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::label::{Label, N_CLASSES};
use crate::text::vectorize::CountMatrix;

/// Smallest effective smoothing value; smaller alphas are raised to this.
const MIN_ALPHA: f64 = 1e-10;

/// Per-class scores or probabilities, indexed by [`Label::index`].
pub type ClassScores = [f64; N_CLASSES];

// ── ModelConfig ────────────────────────────────────────────────────────────

/// Classifier hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Additive (Laplace) smoothing constant.
    pub alpha: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self { alpha: 1.0 }
    }
}

// ── Fitted parameters ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct NbParams {
    class_count: [u64; N_CLASSES],
    feature_count: [Vec<u64>; N_CLASSES],
    class_log_prior: ClassScores,
    feature_log_prob: [Vec<f64>; N_CLASSES],
}

impl NbParams {
    fn n_features(&self) -> usize {
        self.feature_log_prob[0].len()
    }
}

// ── MultinomialNb ──────────────────────────────────────────────────────────

/// Multinomial Naive Bayes classifier for the two message classes.
///
/// Starts unfitted; every prediction method fails with
/// [`ModelError::NotFitted`] until [`fit`](Self::fit) succeeds. After fitting
/// the model is read-only for prediction and can be shared across threads.
#[derive(Debug, Clone)]
pub struct MultinomialNb {
    alpha: f64,
    params: Option<NbParams>,
}

impl MultinomialNb {
    /// Create an unfitted model with smoothing constant `alpha`.
    pub fn new(alpha: f64) -> ModelResult<Self> {
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(ModelError::InvalidAlpha { alpha });
        }
        Ok(Self {
            alpha,
            params: None,
        })
    }

    pub fn from_config(config: &ModelConfig) -> ModelResult<Self> {
        Self::new(config.alpha)
    }

    /// Smoothing constant as configured (before clamping).
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn is_fitted(&self) -> bool {
        self.params.is_some()
    }

    /// Estimate priors and smoothed conditionals from a count matrix.
    ///
    /// Refitting discards the previous parameters. A class with no training
    /// rows gets a prior of zero and is never predicted.
    pub fn fit(&mut self, x: &CountMatrix, y: &[Label]) -> ModelResult<()> {
        if x.n_rows() != y.len() {
            return Err(ModelError::LengthMismatch {
                rows: x.n_rows(),
                labels: y.len(),
            });
        }
        if x.is_empty() || x.n_features() == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }

        let n_features = x.n_features();
        let mut class_count = [0u64; N_CLASSES];
        let mut feature_count: [Vec<u64>; N_CLASSES] = std::array::from_fn(|_| vec![0; n_features]);

        for (row, &label) in x.rows().iter().zip(y) {
            let c = label.index();
            class_count[c] += 1;
            for (col, count) in row.iter() {
                feature_count[c][col] += u64::from(count);
            }
        }

        let alpha = if self.alpha < MIN_ALPHA {
            tracing::warn!(
                alpha = self.alpha,
                "alpha too small, clamping to {MIN_ALPHA} to avoid zero probabilities"
            );
            MIN_ALPHA
        } else {
            self.alpha
        };

        let total: u64 = class_count.iter().sum();
        let class_log_prior: ClassScores = std::array::from_fn(|c| {
            if class_count[c] == 0 {
                f64::NEG_INFINITY
            } else {
                (class_count[c] as f64 / total as f64).ln()
            }
        });

        let feature_log_prob: [Vec<f64>; N_CLASSES] = std::array::from_fn(|c| {
            let class_total: u64 = feature_count[c].iter().sum();
            let log_denom = (class_total as f64 + alpha * n_features as f64).ln();
            feature_count[c]
                .iter()
                .map(|&n| (n as f64 + alpha).ln() - log_denom)
                .collect()
        });

        for label in Label::ALL {
            if class_count[label.index()] == 0 {
                tracing::warn!(class = %label, "no training rows for class; it will never be predicted");
            }
        }
        tracing::debug!(
            rows = total,
            features = n_features,
            ham = class_count[Label::Ham.index()],
            spam = class_count[Label::Spam.index()],
            "fitted multinomial naive bayes"
        );

        self.params = Some(NbParams {
            class_count,
            feature_count,
            class_log_prior,
            feature_log_prob,
        });
        Ok(())
    }

    /// Unnormalized log posterior `log P(c) + Σ_v x_v·log P(v|c)` per row.
    pub fn joint_log_likelihood(&self, x: &CountMatrix) -> ModelResult<Vec<ClassScores>> {
        let params = self.params()?;
        if x.n_features() != params.n_features() {
            return Err(ModelError::DimensionMismatch {
                expected: params.n_features(),
                actual: x.n_features(),
            });
        }

        Ok(x
            .rows()
            .iter()
            .map(|row| {
                std::array::from_fn(|c| {
                    let flp = &params.feature_log_prob[c];
                    params.class_log_prior[c]
                        + row
                            .iter()
                            .map(|(col, count)| f64::from(count) * flp[col])
                            .sum::<f64>()
                })
            })
            .collect())
    }

    /// Most probable class per row; ties go to the lower class index (ham).
    pub fn predict(&self, x: &CountMatrix) -> ModelResult<Vec<Label>> {
        Ok(self
            .joint_log_likelihood(x)?
            .iter()
            .map(|scores| Label::from_index(argmax(scores)))
            .collect())
    }

    /// Class probabilities per row via a max-shifted softmax; rows sum to 1.
    pub fn predict_proba(&self, x: &CountMatrix) -> ModelResult<Vec<ClassScores>> {
        Ok(self
            .joint_log_likelihood(x)?
            .iter()
            .map(softmax)
            .collect())
    }

    /// Predicted label and class probabilities per row from a single
    /// likelihood pass. Labels agree with [`predict`](Self::predict).
    pub fn predict_with_proba(&self, x: &CountMatrix) -> ModelResult<Vec<(Label, ClassScores)>> {
        Ok(self
            .joint_log_likelihood(x)?
            .iter()
            .map(|scores| (Label::from_index(argmax(scores)), softmax(scores)))
            .collect())
    }

    /// Log class probabilities per row via log-sum-exp normalization.
    pub fn predict_log_proba(&self, x: &CountMatrix) -> ModelResult<Vec<ClassScores>> {
        Ok(self
            .joint_log_likelihood(x)?
            .iter()
            .map(|scores| {
                let lse = log_sum_exp(scores);
                std::array::from_fn(|c| scores[c] - lse)
            })
            .collect())
    }

    /// Number of training rows per class.
    pub fn class_count(&self) -> ModelResult<[u64; N_CLASSES]> {
        Ok(self.params()?.class_count)
    }

    /// Summed token counts per class and column.
    pub fn feature_count(&self, label: Label) -> ModelResult<&[u64]> {
        Ok(&self.params()?.feature_count[label.index()])
    }

    pub fn class_log_prior(&self) -> ModelResult<ClassScores> {
        Ok(self.params()?.class_log_prior)
    }

    /// Smoothed `log P(v|c)` for every column of one class.
    pub fn feature_log_prob(&self, label: Label) -> ModelResult<&[f64]> {
        Ok(&self.params()?.feature_log_prob[label.index()])
    }

    /// Vocabulary width the model was fitted on.
    pub fn n_features(&self) -> ModelResult<usize> {
        Ok(self.params()?.n_features())
    }

    fn params(&self) -> ModelResult<&NbParams> {
        self.params.as_ref().ok_or(ModelError::NotFitted)
    }
}

impl Default for MultinomialNb {
    fn default() -> Self {
        Self {
            alpha: ModelConfig::default().alpha,
            params: None,
        }
    }
}

// ── Helpers ────────────────────────────────────────────────────────────────

/// Index of the largest score; the first one wins on ties.
fn argmax(scores: &ClassScores) -> usize {
    let mut best = 0;
    for c in 1..N_CLASSES {
        if scores[c] > scores[best] {
            best = c;
        }
    }
    best
}

fn log_sum_exp(scores: &ClassScores) -> f64 {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return max;
    }
    max + scores.iter().map(|s| (s - max).exp()).sum::<f64>().ln()
}

fn softmax(scores: &ClassScores) -> ClassScores {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: ClassScores = std::array::from_fn(|c| (scores[c] - max).exp());
    let sum: f64 = exps.iter().sum();
    std::array::from_fn(|c| exps[c] / sum)
}
