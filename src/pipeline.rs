//! Vectorizer + classifier composition.
//!
//! [`SpamPipeline`] holds the unfitted stages. [`SpamPipeline::fit`]
//! consumes it and returns a [`TrainedPipeline`], so prediction before
//! training cannot be expressed at this level. The trained pipeline is
//! immutable and can be shared freely across threads.

use serde::{Deserialize, Serialize};

use crate::bayes::{ClassScores, ModelConfig, MultinomialNb};
use crate::error::{ModelError, SpamResult};
use crate::label::Label;
use crate::metrics::{self, Evaluation, ModelScores};
use crate::split::Split;
use crate::text::{CountVectorizer, VectorizerConfig};

// ── PipelineConfig ─────────────────────────────────────────────────────────

/// Settings for both pipeline stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub vectorizer: VectorizerConfig,
    pub model: ModelConfig,
}

// ── Verdict ────────────────────────────────────────────────────────────────

/// Final decision for a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Spam,
    Ham,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spam => "spam",
            Self::Ham => "ham",
        }
    }

    pub fn is_spam(self) -> bool {
        self == Self::Spam
    }

    /// One-line human readable announcement.
    pub fn announcement(self) -> &'static str {
        match self {
            Self::Spam => "This is a Spam Email!",
            Self::Ham => "This is a Ham Email!",
        }
    }
}

impl From<Label> for Verdict {
    fn from(label: Label) -> Self {
        match label {
            Label::Spam => Self::Spam,
            Label::Ham => Self::Ham,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verdict together with the probability behind it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub verdict: Verdict,
    /// Posterior probability of spam (0.0 = ham, 1.0 = spam).
    pub spam_probability: f64,
}

// ── SpamPipeline ───────────────────────────────────────────────────────────

/// Unfitted vectorizer and classifier.
#[derive(Debug, Clone, Default)]
pub struct SpamPipeline {
    vectorizer: CountVectorizer,
    model: MultinomialNb,
}

impl SpamPipeline {
    /// Build an unfitted pipeline. Fails on an invalid smoothing constant.
    pub fn new(config: &PipelineConfig) -> SpamResult<Self> {
        Ok(Self {
            vectorizer: CountVectorizer::new(config.vectorizer.clone()),
            model: MultinomialNb::from_config(&config.model)?,
        })
    }

    /// Learn the vocabulary and the class statistics from labeled messages.
    pub fn fit<S: AsRef<str>>(
        mut self,
        messages: &[S],
        labels: &[Label],
    ) -> SpamResult<TrainedPipeline> {
        if messages.len() != labels.len() {
            return Err(ModelError::LengthMismatch {
                rows: messages.len(),
                labels: labels.len(),
            }
            .into());
        }

        let x = self.vectorizer.fit_transform(messages)?;
        self.model.fit(&x, labels)?;

        let class_count = self.model.class_count()?;
        tracing::info!(
            documents = messages.len(),
            vocabulary = x.n_features(),
            ham = class_count[Label::Ham.index()],
            spam = class_count[Label::Spam.index()],
            alpha = self.model.alpha(),
            "fitted spam pipeline"
        );

        Ok(TrainedPipeline {
            vectorizer: self.vectorizer,
            model: self.model,
        })
    }
}

/// Fit a default-configured pipeline.
pub fn fit<S: AsRef<str>>(messages: &[S], labels: &[Label]) -> SpamResult<TrainedPipeline> {
    SpamPipeline::default().fit(messages, labels)
}

// ── TrainedPipeline ────────────────────────────────────────────────────────

/// A fitted vectorizer and classifier pair, read-only from here on.
#[derive(Debug, Clone)]
pub struct TrainedPipeline {
    vectorizer: CountVectorizer,
    model: MultinomialNb,
}

impl TrainedPipeline {
    pub fn vectorizer(&self) -> &CountVectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &MultinomialNb {
        &self.model
    }

    /// Predicted label per message.
    pub fn predict<S: AsRef<str>>(&self, messages: &[S]) -> SpamResult<Vec<Label>> {
        let x = self.vectorizer.transform(messages)?;
        Ok(self.model.predict(&x)?)
    }

    /// `[p_ham, p_spam]` per message.
    pub fn predict_proba<S: AsRef<str>>(&self, messages: &[S]) -> SpamResult<Vec<ClassScores>> {
        let x = self.vectorizer.transform(messages)?;
        Ok(self.model.predict_proba(&x)?)
    }

    /// Spam or ham for one message.
    pub fn classify(&self, message: &str) -> SpamResult<Verdict> {
        Ok(self.classify_detailed(message)?.verdict)
    }

    /// Verdict plus spam probability for one message.
    pub fn classify_detailed(&self, message: &str) -> SpamResult<Classification> {
        let x = self.vectorizer.transform(&[message])?;
        let (label, proba) = self.model.predict_with_proba(&x)?[0];
        let result = Classification {
            verdict: Verdict::from(label),
            spam_probability: proba[Label::Spam.index()],
        };
        tracing::debug!(
            verdict = %result.verdict,
            spam_probability = result.spam_probability,
            "classified message"
        );
        Ok(result)
    }

    /// Score the pipeline on labeled messages.
    pub fn evaluate<S: AsRef<str>>(&self, messages: &[S], labels: &[Label]) -> SpamResult<Evaluation> {
        let x = self.vectorizer.transform(messages)?;
        let (predicted, spam_scores): (Vec<Label>, Vec<f64>) = self
            .model
            .predict_with_proba(&x)?
            .into_iter()
            .map(|(label, p)| (label, p[Label::Spam.index()]))
            .unzip();
        Ok(metrics::evaluate(labels, &predicted, &spam_scores)?)
    }
}

// ── ModelReport ────────────────────────────────────────────────────────────

/// Training and held-out evaluations of one fitted pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReport {
    pub train: Evaluation,
    pub test: Evaluation,
    pub scores: ModelScores,
}

/// Fit on `split.train`, then evaluate on both sides of the split.
pub fn evaluate_model(
    pipeline: SpamPipeline,
    split: &Split,
) -> SpamResult<(TrainedPipeline, ModelReport)> {
    let trained = pipeline.fit(&split.train.messages(), &split.train.labels())?;
    let train = trained.evaluate(&split.train.messages(), &split.train.labels())?;
    let test = trained.evaluate(&split.test.messages(), &split.test.labels())?;
    let scores = ModelScores::new(&train, &test);
    tracing::info!(
        accuracy_train = scores.accuracy_train,
        accuracy_test = scores.accuracy_test,
        "evaluated model"
    );
    Ok((trained, ModelReport { train, test, scores }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::error::{SpamError, VectorizeError};
    use Label::{Ham, Spam};

    const MESSAGES: [&str; 4] = [
        "win money now",
        "free prize call now",
        "let's meet for lunch",
        "project status update",
    ];
    const LABELS: [Label; 4] = [Spam, Spam, Ham, Ham];

    fn trained() -> TrainedPipeline {
        fit(&MESSAGES, &LABELS).unwrap()
    }

    #[test]
    fn classifies_the_reference_messages() {
        let p = trained();
        assert_eq!(p.classify("win a free prize").unwrap().to_string(), "spam");
        assert_eq!(p.classify("lunch meeting update").unwrap().to_string(), "ham");
    }

    #[test]
    fn detailed_probabilities_match_smoothed_counts() {
        let p = trained();
        // spam: (2/20)^3 vs ham: (1/20)^3 with equal priors
        let spam = p.classify_detailed("win a free prize").unwrap();
        assert!((spam.spam_probability - 8.0 / 9.0).abs() < 1e-9);
        // lunch and update are ham tokens: (1/20)^2 vs (2/20)^2
        let ham = p.classify_detailed("lunch meeting update").unwrap();
        assert!((ham.spam_probability - 0.2).abs() < 1e-9);
        assert_eq!(ham.verdict, Verdict::Ham);
    }

    #[test]
    fn training_accuracy_is_perfect() {
        let eval = trained().evaluate(&MESSAGES, &LABELS).unwrap();
        assert_eq!(eval.accuracy, 1.0);
        assert_eq!(eval.roc_auc, Some(1.0));
    }

    #[test]
    fn probabilities_sum_to_one() {
        let p = trained();
        let inputs = ["win", "", "completely unseen words", "now now now lunch"];
        for row in p.predict_proba(&inputs).unwrap() {
            assert!((row[0] + row[1] - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn detailed_classification_agrees_with_batch_prediction() {
        let p = trained();
        let inputs = ["win a free prize", "lunch meeting update", "", "now"];
        let labels = p.predict(&inputs).unwrap();
        let proba = p.predict_proba(&inputs).unwrap();
        for (i, message) in inputs.iter().enumerate() {
            let result = p.classify_detailed(message).unwrap();
            assert_eq!(result.verdict, Verdict::from(labels[i]));
            assert_eq!(result.spam_probability, proba[i][Spam.index()]);
        }
    }

    #[test]
    fn predict_is_idempotent() {
        let p = trained();
        let inputs = ["call now", "status of lunch", "prize"];
        assert_eq!(p.predict(&inputs).unwrap(), p.predict(&inputs).unwrap());
    }

    #[test]
    fn spam_only_tokens_lean_spam() {
        let proba = trained().predict_proba(&["money prize call"]).unwrap()[0];
        assert!(proba[Spam.index()] >= proba[Ham.index()]);
    }

    #[test]
    fn empty_message_falls_back_to_priors() {
        let p = trained();
        let proba = p.predict_proba(&[""]).unwrap()[0];
        assert!((proba[0] - 0.5).abs() < 1e-12);
        assert_eq!(p.classify("").unwrap(), Verdict::Ham);
    }

    #[test]
    fn all_empty_corpus_has_no_vocabulary() {
        let err = fit(&["", "a", "!"], &[Spam, Ham, Ham]).unwrap_err();
        assert!(matches!(
            err,
            SpamError::Vectorize(VectorizeError::EmptyVocabulary { documents: 3 })
        ));
    }

    #[test]
    fn mismatched_labels_are_rejected() {
        let err = fit(&MESSAGES, &LABELS[..3]).unwrap_err();
        assert!(matches!(
            err,
            SpamError::Model(ModelError::LengthMismatch { rows: 4, labels: 3 })
        ));
    }

    #[test]
    fn empty_corpus_has_no_vocabulary() {
        let err = fit::<&str>(&[], &[]).unwrap_err();
        assert!(matches!(
            err,
            SpamError::Vectorize(VectorizeError::EmptyVocabulary { documents: 0 })
        ));
    }

    #[test]
    fn invalid_alpha_is_rejected_at_construction() {
        let config = PipelineConfig {
            model: ModelConfig { alpha: -1.0 },
            ..PipelineConfig::default()
        };
        let err = SpamPipeline::new(&config).unwrap_err();
        assert!(matches!(err, SpamError::Model(ModelError::InvalidAlpha { .. })));
    }

    #[test]
    fn trained_pipeline_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TrainedPipeline>();
    }

    #[test]
    fn evaluate_model_reports_both_sets() {
        let train = Dataset::from_pairs(MESSAGES.iter().copied().zip(LABELS));
        let test = Dataset::from_pairs([("free money", Spam), ("lunch update", Ham)]);
        let split = Split { train, test };
        let (trained, report) = evaluate_model(SpamPipeline::default(), &split).unwrap();
        assert_eq!(trained.vectorizer().vocabulary().map(|v| v.len()), Some(13));
        assert_eq!(report.scores.accuracy_train, 1.0);
        assert_eq!(report.scores.accuracy_test, 1.0);
        assert_eq!(report.test.confusion.total(), 2);
        assert!(report.test.roc.is_some());
    }

    #[test]
    fn verdict_display_and_announcement() {
        assert_eq!(Verdict::Spam.as_str(), "spam");
        assert_eq!(Verdict::from(Ham), Verdict::Ham);
        assert_eq!(Verdict::Ham.announcement(), "This is a Ham Email!");
        assert!(Verdict::Spam.is_spam());
    }
}
