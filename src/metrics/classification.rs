//! Threshold metrics: confusion matrix, accuracy, precision, recall, F1.
//!
//! Spam is the positive class. Precision or recall with a zero denominator
//! is reported as 0.0.

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, EvalResult};
use crate::label::{Label, N_CLASSES};

/// Reject empty or unequal label sequences.
pub(crate) fn check_lengths(expected: usize, actual: usize) -> EvalResult<()> {
    if expected != actual {
        return Err(EvalError::LengthMismatch { expected, actual });
    }
    if expected == 0 {
        return Err(EvalError::Empty);
    }
    Ok(())
}

// ── ConfusionMatrix ────────────────────────────────────────────────────────

/// 2×2 counts of (true label, predicted label) pairs, indexed `[true][predicted]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    counts: [[u64; N_CLASSES]; N_CLASSES],
}

impl ConfusionMatrix {
    pub fn from_labels(y_true: &[Label], y_pred: &[Label]) -> EvalResult<Self> {
        check_lengths(y_true.len(), y_pred.len())?;
        let mut counts = [[0u64; N_CLASSES]; N_CLASSES];
        for (t, p) in y_true.iter().zip(y_pred) {
            counts[t.index()][p.index()] += 1;
        }
        Ok(Self { counts })
    }

    /// Number of samples with true label `actual` predicted as `predicted`.
    pub fn get(&self, actual: Label, predicted: Label) -> u64 {
        self.counts[actual.index()][predicted.index()]
    }

    /// Raw counts, rows = true label, columns = predicted label.
    pub fn counts(&self) -> [[u64; N_CLASSES]; N_CLASSES] {
        self.counts
    }

    pub fn true_positives(&self) -> u64 {
        self.get(Label::Spam, Label::Spam)
    }

    pub fn false_positives(&self) -> u64 {
        self.get(Label::Ham, Label::Spam)
    }

    pub fn false_negatives(&self) -> u64 {
        self.get(Label::Spam, Label::Ham)
    }

    pub fn true_negatives(&self) -> u64 {
        self.get(Label::Ham, Label::Ham)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Correct predictions (the diagonal).
    pub fn correct(&self) -> u64 {
        (0..N_CLASSES).map(|c| self.counts[c][c]).sum()
    }

    /// Samples whose true label is `label`.
    pub fn support(&self, label: Label) -> u64 {
        self.counts[label.index()].iter().sum()
    }

    /// Samples predicted as `label`.
    pub fn predicted(&self, label: Label) -> u64 {
        self.counts.iter().map(|row| row[label.index()]).sum()
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }

    /// Precision, recall, F1 and support with `label` as the positive class.
    pub fn class_metrics(&self, label: Label) -> ClassMetrics {
        let hits = self.get(label, label);
        let precision = ratio(hits, self.predicted(label));
        let recall = ratio(hits, self.support(label));
        ClassMetrics {
            precision,
            recall,
            f1: harmonic_mean(precision, recall),
            support: self.support(label),
        }
    }
}

impl std::fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:>12} | {:>9} | {:>9}", "true \\ pred", "ham", "spam")?;
        for label in Label::ALL {
            writeln!(
                f,
                "{:>12} | {:>9} | {:>9}",
                label.to_string(),
                self.get(label, Label::Ham),
                self.get(label, Label::Spam)
            )?;
        }
        Ok(())
    }
}

// ── Metrics ────────────────────────────────────────────────────────────────

/// Precision, recall and F1 for one class (or an average over classes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: u64,
}

/// Fraction of predictions equal to the true label.
pub fn accuracy(y_true: &[Label], y_pred: &[Label]) -> EvalResult<f64> {
    Ok(ConfusionMatrix::from_labels(y_true, y_pred)?.accuracy())
}

/// Spam precision: TP / (TP + FP).
pub fn precision(y_true: &[Label], y_pred: &[Label]) -> EvalResult<f64> {
    Ok(ConfusionMatrix::from_labels(y_true, y_pred)?
        .class_metrics(Label::Spam)
        .precision)
}

/// Spam recall: TP / (TP + FN).
pub fn recall(y_true: &[Label], y_pred: &[Label]) -> EvalResult<f64> {
    Ok(ConfusionMatrix::from_labels(y_true, y_pred)?
        .class_metrics(Label::Spam)
        .recall)
}

/// Spam F1: harmonic mean of precision and recall.
pub fn f1_score(y_true: &[Label], y_pred: &[Label]) -> EvalResult<f64> {
    Ok(ConfusionMatrix::from_labels(y_true, y_pred)?
        .class_metrics(Label::Spam)
        .f1)
}

// ── ClassificationReport ───────────────────────────────────────────────────

/// Per-class metrics with accuracy, macro and support-weighted averages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub ham: ClassMetrics,
    pub spam: ClassMetrics,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    pub fn from_labels(y_true: &[Label], y_pred: &[Label]) -> EvalResult<Self> {
        Ok(Self::from_confusion(&ConfusionMatrix::from_labels(
            y_true, y_pred,
        )?))
    }

    pub fn from_confusion(cm: &ConfusionMatrix) -> Self {
        let per_class = Label::ALL.map(|l| cm.class_metrics(l));
        let total = cm.total();
        let n = N_CLASSES as f64;

        let macro_avg = ClassMetrics {
            precision: per_class.iter().map(|m| m.precision).sum::<f64>() / n,
            recall: per_class.iter().map(|m| m.recall).sum::<f64>() / n,
            f1: per_class.iter().map(|m| m.f1).sum::<f64>() / n,
            support: total,
        };

        let weighted = |value: fn(&ClassMetrics) -> f64| -> f64 {
            if total == 0 {
                return 0.0;
            }
            per_class
                .iter()
                .map(|m| value(m) * m.support as f64)
                .sum::<f64>()
                / total as f64
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(|m| m.precision),
            recall: weighted(|m| m.recall),
            f1: weighted(|m| m.f1),
            support: total,
        };

        Self {
            ham: per_class[Label::Ham.index()],
            spam: per_class[Label::Spam.index()],
            accuracy: cm.accuracy(),
            macro_avg,
            weighted_avg,
        }
    }

    /// Metrics for one class.
    pub fn class(&self, label: Label) -> &ClassMetrics {
        match label {
            Label::Ham => &self.ham,
            Label::Spam => &self.spam,
        }
    }
}

impl std::fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "| {:<12} | {:>9} | {:>9} | {:>9} | {:>7} |",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f, "|:{:-<12}-|-{:->9}:|-{:->9}:|-{:->9}:|-{:->7}:|", "", "", "", "", "")?;
        write_row(f, "ham", &self.ham)?;
        write_row(f, "spam", &self.spam)?;
        writeln!(
            f,
            "| {:<12} | {:>9} | {:>9} | {:>9.4} | {:>7} |",
            "accuracy", "", "", self.accuracy, self.weighted_avg.support
        )?;
        write_row(f, "macro avg", &self.macro_avg)?;
        write_row(f, "weighted avg", &self.weighted_avg)
    }
}

fn write_row(f: &mut std::fmt::Formatter<'_>, name: &str, m: &ClassMetrics) -> std::fmt::Result {
    writeln!(
        f,
        "| {:<12} | {:>9.4} | {:>9.4} | {:>9.4} | {:>7} |",
        name, m.precision, m.recall, m.f1, m.support
    )
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn ratio(num: u64, denom: u64) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}

fn harmonic_mean(a: f64, b: f64) -> f64 {
    if a + b == 0.0 { 0.0 } else { 2.0 * a * b / (a + b) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Label::{Ham, Spam};

    // TP = 2, FN = 1, FP = 1, TN = 4.
    fn labels() -> (Vec<Label>, Vec<Label>) {
        let y_true = vec![Spam, Spam, Spam, Ham, Ham, Ham, Ham, Ham];
        let y_pred = vec![Spam, Spam, Ham, Spam, Ham, Ham, Ham, Ham];
        (y_true, y_pred)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn confusion_matrix_counts() {
        let (t, p) = labels();
        let cm = ConfusionMatrix::from_labels(&t, &p).unwrap();
        assert_eq!(cm.true_positives(), 2);
        assert_eq!(cm.false_negatives(), 1);
        assert_eq!(cm.false_positives(), 1);
        assert_eq!(cm.true_negatives(), 4);
        assert_eq!(cm.counts(), [[4, 1], [1, 2]]);
        assert_eq!(cm.total(), 8);
    }

    #[test]
    fn binary_metrics() {
        let (t, p) = labels();
        assert!(close(accuracy(&t, &p).unwrap(), 6.0 / 8.0));
        assert!(close(precision(&t, &p).unwrap(), 2.0 / 3.0));
        assert!(close(recall(&t, &p).unwrap(), 2.0 / 3.0));
        assert!(close(f1_score(&t, &p).unwrap(), 2.0 / 3.0));
    }

    #[test]
    fn report_averages() {
        let (t, p) = labels();
        let report = ClassificationReport::from_labels(&t, &p).unwrap();

        // Ham: precision 4/5, recall 4/5.
        assert!(close(report.ham.precision, 0.8));
        assert!(close(report.ham.recall, 0.8));
        assert_eq!(report.ham.support, 5);
        assert_eq!(report.spam.support, 3);

        assert!(close(report.macro_avg.precision, (0.8 + 2.0 / 3.0) / 2.0));
        let weighted = (0.8 * 5.0 + (2.0 / 3.0) * 3.0) / 8.0;
        assert!(close(report.weighted_avg.precision, weighted));
        assert!(close(report.weighted_avg.recall, 0.75));
        assert_eq!(report.weighted_avg.support, 8);
    }

    #[test]
    fn weighted_recall_equals_accuracy() {
        let (t, p) = labels();
        let report = ClassificationReport::from_labels(&t, &p).unwrap();
        assert!(close(report.weighted_avg.recall, report.accuracy));
    }

    #[test]
    fn zero_division_yields_zero() {
        let t = vec![Ham, Ham];
        let p = vec![Ham, Ham];
        let report = ClassificationReport::from_labels(&t, &p).unwrap();
        assert_eq!(report.spam.precision, 0.0);
        assert_eq!(report.spam.recall, 0.0);
        assert_eq!(report.spam.f1, 0.0);
        assert!(close(report.accuracy, 1.0));
    }

    #[test]
    fn perfect_predictions() {
        let t = vec![Spam, Ham, Spam, Ham];
        let report = ClassificationReport::from_labels(&t, &t).unwrap();
        assert!(close(report.accuracy, 1.0));
        assert!(close(report.weighted_avg.f1, 1.0));
        assert!(close(report.macro_avg.precision, 1.0));
    }

    #[test]
    fn length_mismatch_and_empty_are_errors() {
        assert!(matches!(
            accuracy(&[Spam], &[Spam, Ham]),
            Err(EvalError::LengthMismatch {
                expected: 1,
                actual: 2
            })
        ));
        assert!(matches!(accuracy(&[], &[]), Err(EvalError::Empty)));
    }

    #[test]
    fn report_renders_markdown_rows() {
        let (t, p) = labels();
        let text = ClassificationReport::from_labels(&t, &p).unwrap().to_string();
        assert!(text.contains("| ham "));
        assert!(text.contains("| weighted avg "));
        assert!(text.contains("0.7500"));
    }
}
