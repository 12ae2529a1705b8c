//! Rich diagnostic error types for spam-detect.
//!
//! Each stage of the pipeline defines its own error type with miette
//! `#[diagnostic]` derives, so a failure reports which stage broke, an
//! error code, and what the caller can do about it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for spam-detect.
///
/// Each variant wraps a stage-specific error, preserving its diagnostic
/// code and help text through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum SpamError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Vectorize(#[from] VectorizeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Vectorizer errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum VectorizeError {
    #[error("empty vocabulary: the training corpus of {documents} documents yielded no tokens")]
    #[diagnostic(
        code(spam::vectorize::empty_vocabulary),
        help(
            "Every training message was empty or consisted only of tokens shorter \
             than `min_token_len` (or filtered out by `min_df`/`max_df`). \
             Check the message column of the dataset and the vectorizer settings."
        )
    )]
    EmptyVocabulary { documents: usize },

    #[error("vectorizer is not fitted")]
    #[diagnostic(
        code(spam::vectorize::not_fitted),
        help("Call `CountVectorizer::fit` on the training messages before `transform`.")
    )]
    NotFitted,
}

// ---------------------------------------------------------------------------
// Classifier errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ModelError {
    #[error("classifier is not fitted")]
    #[diagnostic(
        code(spam::model::not_fitted),
        help("Call `MultinomialNb::fit` before `predict` or `predict_proba`.")
    )]
    NotFitted,

    #[error("dimension mismatch: expected {expected} features, got {actual}")]
    #[diagnostic(
        code(spam::model::dim_mismatch),
        help(
            "Feature vectors must come from the same fitted vectorizer that produced \
             the training matrix. This indicates a vectorizer/classifier pairing bug."
        )
    )]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("length mismatch: {rows} feature rows but {labels} labels")]
    #[diagnostic(
        code(spam::model::len_mismatch),
        help("Provide exactly one label per training message.")
    )]
    LengthMismatch { rows: usize, labels: usize },

    #[error("empty training set")]
    #[diagnostic(
        code(spam::model::empty_training_set),
        help("Fit requires at least one labeled message with at least one feature.")
    )]
    EmptyTrainingSet,

    #[error("invalid smoothing parameter alpha = {alpha}")]
    #[diagnostic(
        code(spam::model::invalid_alpha),
        help("Alpha must be a finite, non-negative number (Laplace smoothing uses 1.0).")
    )]
    InvalidAlpha { alpha: f64 },
}

// ---------------------------------------------------------------------------
// Evaluator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EvalError {
    #[error("length mismatch: {expected} true labels but {actual} predictions")]
    #[diagnostic(
        code(spam::eval::len_mismatch),
        help("Predictions must be computed on the same messages as the true labels.")
    )]
    LengthMismatch { expected: usize, actual: usize },

    #[error("cannot evaluate an empty set of predictions")]
    #[diagnostic(
        code(spam::eval::empty),
        help("Evaluate on at least one labeled message.")
    )]
    Empty,
}

// ---------------------------------------------------------------------------
// Dataset errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum DatasetError {
    #[error("failed to read dataset: {path}")]
    #[diagnostic(
        code(spam::dataset::io),
        help("Check that the CSV file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {message}")]
    #[diagnostic(
        code(spam::dataset::csv),
        help(
            "The file could not be parsed as CSV. It must have a header row; \
             quoted fields may contain commas."
        )
    )]
    Csv { message: String },

    #[error("column \"{column}\" not found in CSV header")]
    #[diagnostic(
        code(spam::dataset::missing_column),
        help(
            "Set `dataset.text_column` and `dataset.label_column` in the config \
             to the header names of the message and category columns."
        )
    )]
    MissingColumn { column: String },

    #[error("dataset contains no samples")]
    #[diagnostic(
        code(spam::dataset::empty),
        help("The CSV has a header but no usable records.")
    )]
    Empty,

    #[error("cannot split {samples} samples with test_size = {test_size}")]
    #[diagnostic(
        code(spam::dataset::invalid_split),
        help(
            "test_size must lie strictly between 0 and 1 and leave at least one \
             sample on each side of the split."
        )
    )]
    InvalidSplit { test_size: f64, samples: usize },
}

impl From<csv::Error> for DatasetError {
    fn from(e: csv::Error) -> Self {
        Self::Csv {
            message: e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(spam::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(spam::config::parse),
        help("Check the TOML syntax and field types in the config file.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(spam::config::write),
        help("Ensure you have write permissions to the target directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config value for {field}: {message}")]
    #[diagnostic(code(spam::config::invalid))]
    Invalid { field: String, message: String },
}

/// Convenience alias for functions returning spam-detect results.
pub type SpamResult<T> = std::result::Result<T, SpamError>;

pub type VectorizeResult<T> = std::result::Result<T, VectorizeError>;
pub type ModelResult<T> = std::result::Result<T, ModelError>;
pub type EvalResult<T> = std::result::Result<T, EvalError>;
pub type DatasetResult<T> = std::result::Result<T, DatasetError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectorize_error_converts_to_spam_error() {
        let err = VectorizeError::EmptyVocabulary { documents: 3 };
        let spam: SpamError = err.into();
        assert!(matches!(
            spam,
            SpamError::Vectorize(VectorizeError::EmptyVocabulary { documents: 3 })
        ));
    }

    #[test]
    fn model_error_converts_to_spam_error() {
        let spam: SpamError = ModelError::NotFitted.into();
        assert!(matches!(spam, SpamError::Model(ModelError::NotFitted)));
    }

    #[test]
    fn dimension_mismatch_message_names_both_sizes() {
        let err = ModelError::DimensionMismatch {
            expected: 120,
            actual: 7,
        };
        let msg = format!("{err}");
        assert!(msg.contains("120"));
        assert!(msg.contains('7'));
    }

    #[test]
    fn transparent_wrapper_keeps_inner_message() {
        let spam: SpamError = DatasetError::MissingColumn {
            column: "v2".into(),
        }
        .into();
        assert!(spam.to_string().contains("\"v2\""));
    }

    #[test]
    fn diagnostic_codes_are_namespaced() {
        let err = VectorizeError::NotFitted;
        let code = err.code().map(|c| c.to_string()).unwrap_or_default();
        assert_eq!(code, "spam::vectorize::not_fitted");
    }
}
