//! ROC curve and area under it, computed from positive-class scores.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::EvalResult;
use crate::label::Label;

use super::classification::check_lengths;

/// Receiver operating characteristic: one point per distinct score.
///
/// Points are ordered by decreasing threshold, starting at `(0, 0)` with a
/// threshold of `+inf` and ending at `(1, 1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    pub thresholds: Vec<f64>,
}

impl RocCurve {
    /// Trapezoidal area under the curve.
    pub fn auc(&self) -> f64 {
        self.fpr
            .windows(2)
            .zip(self.tpr.windows(2))
            .map(|(x, y)| (x[1] - x[0]) * (y[1] + y[0]) / 2.0)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.fpr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fpr.is_empty()
    }
}

/// Rank samples by `scores` (probability of spam) and trace TPR against FPR.
///
/// Returns `None` when the true labels contain only one class: one of the
/// rates would have a zero denominator.
pub fn roc_curve(y_true: &[Label], scores: &[f64]) -> EvalResult<Option<RocCurve>> {
    check_lengths(y_true.len(), scores.len())?;

    let positives = y_true.iter().filter(|l| l.is_spam()).count();
    let negatives = y_true.len() - positives;
    if positives == 0 || negatives == 0 {
        return Ok(None);
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut curve = RocCurve {
        fpr: vec![0.0],
        tpr: vec![0.0],
        thresholds: vec![f64::INFINITY],
    };
    let (mut tp, mut fp) = (0usize, 0usize);
    for (k, &i) in order.iter().enumerate() {
        if y_true[i].is_spam() {
            tp += 1;
        } else {
            fp += 1;
        }
        // Tied scores form a single threshold.
        let group_ends = order
            .get(k + 1)
            .is_none_or(|&next| scores[next].total_cmp(&scores[i]) != Ordering::Equal);
        if group_ends {
            curve.fpr.push(fp as f64 / negatives as f64);
            curve.tpr.push(tp as f64 / positives as f64);
            curve.thresholds.push(scores[i]);
        }
    }
    Ok(Some(curve))
}

/// Area under the ROC curve; `None` when only one class is present.
///
/// Equals the probability that a random spam message scores above a random
/// ham message, counting ties as one half.
pub fn roc_auc_score(y_true: &[Label], scores: &[f64]) -> EvalResult<Option<f64>> {
    Ok(roc_curve(y_true, scores)?.map(|c| c.auc()))
}
