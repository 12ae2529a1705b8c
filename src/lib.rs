// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # spam-detect
//!
//! Bag-of-words multinomial Naive Bayes classification of short text
//! messages as spam or ham.
//!
//! ## Architecture
//!
//! - **Text** (`text`): tokenization and the count vectorizer
//! - **Classifier** (`bayes`): Laplace-smoothed multinomial Naive Bayes
//! - **Evaluation** (`metrics`): confusion matrix, precision/recall/F1, ROC
//! - **Pipeline** (`pipeline`): vectorizer + classifier, fit once, predict many
//! - **Data** (`dataset`, `split`, `explore`): CSV loading, seeded split, summaries
//!
//! ## Library usage
//!
//! ```
//! use spam_detect::label::Label;
//! use spam_detect::pipeline;
//!
//! let messages = ["win money now", "free prize call now", "let's meet for lunch", "project status update"];
//! let labels = [Label::Spam, Label::Spam, Label::Ham, Label::Ham];
//! let trained = pipeline::fit(&messages, &labels).unwrap();
//! assert_eq!(trained.classify("win a free prize").unwrap().to_string(), "spam");
//! ```

pub mod bayes;
pub mod config;
pub mod dataset;
pub mod error;
pub mod explore;
pub mod label;
pub mod metrics;
pub mod pipeline;
pub mod split;
pub mod text;

pub use error::{SpamError, SpamResult};
pub use label::Label;
pub use pipeline::{SpamPipeline, TrainedPipeline, Verdict};
