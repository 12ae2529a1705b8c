//! End-to-end tests for spam-detect.
//!
//! These tests run the whole flow from a CSV file on disk through the
//! seeded split, fitting, evaluation and single-message classification,
//! validating that loading, configuration and the pipeline work together.

use std::path::{Path, PathBuf};

use spam_detect::config::Config;
use spam_detect::dataset::Dataset;
use spam_detect::error::{DatasetError, SpamError};
use spam_detect::explore;
use spam_detect::label::Label;
use spam_detect::pipeline::{self, SpamPipeline, Verdict};
use spam_detect::split::{Split, train_test_split};

const SPAM: &[&str] = &[
    "WINNER!! You have won a free prize, call now to claim",
    "Free entry to win cash, txt WIN to 80086 now",
    "URGENT! Claim your free cash prize now",
    "You won a free holiday, call to claim your prize",
    "Congratulations, free ringtone offer, txt now",
    "Claim your cash reward now, call free",
];

const HAM: &[&str] = &[
    "Are we still meeting for lunch today?",
    "I'll be home late tonight, see you later",
    "Can you send me the project update?",
    "Ok see you at the meeting tomorrow",
    "Thanks for lunch, it was great",
    "Let me know when you get home",
    "The project meeting moved to later today",
    "Did you see the update from the team?",
];

fn write_corpus(dir: &Path) -> PathBuf {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["v1", "v2", "", "", ""]).unwrap();
    for (i, message) in SPAM.iter().chain(HAM).enumerate() {
        let category = if i < SPAM.len() { "spam" } else { "ham" };
        wtr.write_record([category, *message, "", "", ""]).unwrap();
    }
    let path = dir.join("spam.csv");
    std::fs::write(&path, wtr.into_inner().unwrap()).unwrap();
    path
}

#[test]
fn load_split_fit_evaluate() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_corpus(dir.path());
    let config = Config::default();

    let dataset = Dataset::load_csv(&path, &config.dataset).unwrap();
    assert_eq!(dataset.len(), SPAM.len() + HAM.len());
    assert_eq!(dataset.count(Label::Spam), SPAM.len());

    let split = Split::from_config(dataset, &config.split).unwrap();
    assert_eq!(split.test.len(), 4);
    assert_eq!(split.train.len(), 10);

    let pipeline = SpamPipeline::new(&config.pipeline()).unwrap();
    let (trained, report) = pipeline::evaluate_model(pipeline, &split).unwrap();

    assert_eq!(report.train.confusion.total(), 10);
    assert_eq!(report.test.confusion.total(), 4);
    assert!(report.scores.accuracy_train >= 0.9);
    for eval in [&report.train, &report.test] {
        assert!((0.0..=1.0).contains(&eval.accuracy));
        if let Some(auc) = eval.roc_auc {
            assert!((0.0..=1.0).contains(&auc));
        }
    }

    let proba = trained.predict_proba(&split.test.messages()).unwrap();
    for row in proba {
        assert!((row[0] + row[1] - 1.0).abs() < 1e-9);
    }
}

#[test]
fn full_corpus_classifies_obvious_messages() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_corpus(dir.path());
    let dataset = Dataset::load_csv(&path, &Config::default().dataset).unwrap();

    let trained = pipeline::fit(&dataset.messages(), &dataset.labels()).unwrap();
    assert_eq!(trained.classify("claim your free cash prize").unwrap(), Verdict::Spam);
    assert_eq!(trained.classify("see you at lunch").unwrap(), Verdict::Ham);

    let eval = trained.evaluate(&dataset.messages(), &dataset.labels()).unwrap();
    assert_eq!(eval.accuracy, 1.0);
    assert_eq!(eval.roc_auc, Some(1.0));
}

#[test]
fn same_seed_gives_same_report() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_corpus(dir.path());
    let config = Config::default();

    let run = || {
        let dataset = Dataset::load_csv(&path, &config.dataset).unwrap();
        let split = train_test_split(dataset, 0.3, 11).unwrap();
        pipeline::evaluate_model(SpamPipeline::default(), &split)
            .unwrap()
            .1
    };
    assert_eq!(run(), run());
}

#[test]
fn config_file_drives_columns_and_split() {
    let dir = tempfile::TempDir::new().unwrap();
    let csv_path = dir.path().join("custom.csv");
    std::fs::write(
        &csv_path,
        "label,text\n1,free prize now\n0,lunch later\n1,win cash now\n0,project update\n",
    )
    .unwrap();

    let toml_path = dir.path().join("spam.toml");
    std::fs::write(
        &toml_path,
        "[dataset]\ntext_column = \"text\"\nlabel_column = \"label\"\nspam_value = \"1\"\n\n\
         [split]\ntest_size = 0.5\nseed = 3\n",
    )
    .unwrap();

    let config = Config::load(&toml_path).unwrap();
    let dataset = Dataset::load_csv(&csv_path, &config.dataset).unwrap();
    assert_eq!(dataset.count(Label::Spam), 2);

    let split = Split::from_config(dataset, &config.split).unwrap();
    assert_eq!(split.train.len(), 2);
    assert_eq!(split.test.len(), 2);
}

#[test]
fn missing_column_surfaces_as_dataset_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "category,body\nspam,free\n").unwrap();

    let err: SpamError = Dataset::load_csv(&path, &Config::default().dataset)
        .unwrap_err()
        .into();
    assert!(matches!(err, SpamError::Dataset(DatasetError::MissingColumn { .. })));
}

#[test]
fn exploration_of_loaded_corpus() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_corpus(dir.path());
    let dataset = Dataset::load_csv(&path, &Config::default().dataset).unwrap();

    let summary = explore::summarize(&dataset, 5);
    assert_eq!(summary.rows, 14);
    assert_eq!(summary.duplicates, 0);
    assert_eq!(summary.columns.len(), 5);
    assert_eq!(summary.columns[4].missing, 14);
    assert_eq!(summary.class(Label::Spam).unwrap().count, 6);
    assert_eq!(summary.top_spam_words.len(), 5);
    assert_eq!(summary.top_spam_words[0].word, "free");

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["rows"], 14);
}
