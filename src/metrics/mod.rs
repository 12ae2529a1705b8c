//! Evaluation of predictions against true labels.
//!
//! Everything here is a pure computation returning serializable values;
//! printing and plotting belong to the caller.

pub mod classification;
pub mod roc;

pub use classification::{
    ClassMetrics, ClassificationReport, ConfusionMatrix, accuracy, f1_score, precision, recall,
};
pub use roc::{RocCurve, roc_auc_score, roc_curve};

use serde::{Deserialize, Serialize};

use crate::error::EvalResult;
use crate::label::Label;

use classification::check_lengths;

/// All metrics for one labeled set of messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub confusion: ConfusionMatrix,
    pub report: ClassificationReport,
    pub accuracy: f64,
    /// `None` when the set contains a single class.
    pub roc_auc: Option<f64>,
    pub roc: Option<RocCurve>,
}

/// Evaluate hard predictions and spam probabilities against `y_true`.
pub fn evaluate(y_true: &[Label], y_pred: &[Label], spam_scores: &[f64]) -> EvalResult<Evaluation> {
    check_lengths(y_true.len(), spam_scores.len())?;
    let confusion = ConfusionMatrix::from_labels(y_true, y_pred)?;
    let roc = roc_curve(y_true, spam_scores)?;
    if roc.is_none() {
        tracing::warn!(
            samples = y_true.len(),
            "only one class present in true labels; ROC-AUC is undefined"
        );
    }

    Ok(Evaluation {
        report: ClassificationReport::from_confusion(&confusion),
        accuracy: confusion.accuracy(),
        roc_auc: roc.as_ref().map(RocCurve::auc),
        roc,
        confusion,
    })
}

// ── ModelScores ────────────────────────────────────────────────────────────

/// Headline scores of a model on its training and test sets.
///
/// Precision, recall and F1 are the support-weighted averages over both
/// classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelScores {
    pub precision_train: f64,
    pub precision_test: f64,
    pub recall_train: f64,
    pub recall_test: f64,
    pub accuracy_train: f64,
    pub accuracy_test: f64,
    pub roc_auc_train: Option<f64>,
    pub roc_auc_test: Option<f64>,
    pub f1_train: f64,
    pub f1_test: f64,
}

impl ModelScores {
    pub fn new(train: &Evaluation, test: &Evaluation) -> Self {
        Self {
            precision_train: train.report.weighted_avg.precision,
            precision_test: test.report.weighted_avg.precision,
            recall_train: train.report.weighted_avg.recall,
            recall_test: test.report.weighted_avg.recall,
            accuracy_train: train.accuracy,
            accuracy_test: test.accuracy,
            roc_auc_train: train.roc_auc,
            roc_auc_test: test.roc_auc,
            f1_train: train.report.weighted_avg.f1,
            f1_test: test.report.weighted_avg.f1,
        }
    }
}

impl std::fmt::Display for ModelScores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let auc = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"));
        writeln!(f, "| {:<9} | {:>9} | {:>9} |", "metric", "train", "test")?;
        writeln!(f, "|:{:-<9}-|-{:->9}:|-{:->9}:|", "", "", "")?;
        let rows = [
            ("precision", self.precision_train, self.precision_test),
            ("recall", self.recall_train, self.recall_test),
            ("accuracy", self.accuracy_train, self.accuracy_test),
        ];
        for (name, train, test) in rows {
            writeln!(f, "| {name:<9} | {train:>9.4} | {test:>9.4} |")?;
        }
        writeln!(
            f,
            "| {:<9} | {:>9} | {:>9} |",
            "roc auc",
            auc(self.roc_auc_train),
            auc(self.roc_auc_test)
        )?;
        writeln!(f, "| {:<9} | {:>9.4} | {:>9.4} |", "f1", self.f1_train, self.f1_test)
    }
}
