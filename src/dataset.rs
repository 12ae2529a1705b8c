//! Labeled message datasets and CSV loading.
//!
//! The expected input is a two-column table of raw message text and a
//! category label, such as the classic SMS spam corpus (`v1` = "ham"/"spam",
//! `v2` = message, plus empty trailing columns). Files are decoded as UTF-8
//! when valid and as Windows-1252 (a superset of ISO-8859-1) otherwise.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, DatasetResult};
use crate::label::Label;

// ── DatasetConfig ──────────────────────────────────────────────────────────

/// Which CSV columns hold the message and its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Header of the message column.
    pub text_column: String,
    /// Header of the category column.
    pub label_column: String,
    /// Category value meaning spam; every other value is ham.
    pub spam_value: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            text_column: "v2".into(),
            label_column: "v1".into(),
            spam_value: "spam".into(),
        }
    }
}

impl DatasetConfig {
    /// Map a raw category value to a label.
    pub fn label_of(&self, category: &str) -> Label {
        Label::from(category.trim() == self.spam_value)
    }
}

// ── TableProfile ───────────────────────────────────────────────────────────

/// Missing and distinct value counts of one CSV column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Records where the field is absent or blank.
    pub missing: usize,
    /// Distinct non-blank values.
    pub unique: usize,
}

/// Shape of the raw CSV table a dataset was read from, before records
/// were filtered down to labeled messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableProfile {
    pub records: usize,
    pub columns: Vec<ColumnProfile>,
}

impl TableProfile {
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }
}

// ── Sample / Dataset ───────────────────────────────────────────────────────

/// One labeled message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sample {
    pub message: String,
    pub label: Label,
}

impl Sample {
    pub fn new(message: impl Into<String>, label: Label) -> Self {
        Self {
            message: message.into(),
            label,
        }
    }
}

/// An owned, ordered collection of labeled messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    samples: Vec<Sample>,
    /// Present when loaded from CSV.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    profile: Option<TableProfile>,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self {
            samples,
            profile: None,
        }
    }

    /// Build from `(message, label)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Label)>,
        S: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(message, label)| Sample::new(message, label))
                .collect(),
        )
    }

    /// Load a CSV file with a header row.
    pub fn load_csv(path: &Path, config: &DatasetConfig) -> DatasetResult<Self> {
        let file = std::fs::File::open(path).map_err(|e| DatasetError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let dataset = Self::from_csv_reader(std::io::BufReader::new(file), config)?;
        tracing::info!(
            path = %path.display(),
            samples = dataset.len(),
            spam = dataset.count(Label::Spam),
            ham = dataset.count(Label::Ham),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Parse CSV from any reader. Records missing either column are skipped.
    pub fn from_csv_reader<R: Read>(reader: R, config: &DatasetConfig) -> DatasetResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.byte_headers()?.iter().map(decode_field).collect();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| DatasetError::MissingColumn {
                    column: name.to_string(),
                })
        };
        let text_idx = column(&config.text_column)?;
        let label_idx = column(&config.label_column)?;

        let mut samples = Vec::new();
        let mut skipped = 0usize;
        let mut records = 0usize;
        let mut missing = vec![0usize; headers.len()];
        let mut distinct: Vec<HashSet<Vec<u8>>> = vec![HashSet::new(); headers.len()];
        for record in rdr.byte_records() {
            let record = record?;
            records += 1;
            for (i, (miss, seen)) in missing.iter_mut().zip(&mut distinct).enumerate() {
                match record.get(i) {
                    Some(field) if !field.trim_ascii().is_empty() => {
                        seen.insert(field.to_vec());
                    }
                    _ => *miss += 1,
                }
            }
            match (record.get(text_idx), record.get(label_idx)) {
                (Some(text), Some(category)) => samples.push(Sample::new(
                    decode_field(text),
                    config.label_of(&decode_field(category)),
                )),
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, "skipped CSV records with missing columns");
        }
        if samples.is_empty() {
            return Err(DatasetError::Empty);
        }
        let columns = headers
            .into_iter()
            .zip(missing)
            .zip(distinct)
            .map(|((name, missing), seen)| ColumnProfile {
                name,
                missing,
                unique: seen.len(),
            })
            .collect();
        Ok(Self {
            samples,
            profile: Some(TableProfile { records, columns }),
        })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Raw table statistics, when the dataset came from CSV.
    pub fn profile(&self) -> Option<&TableProfile> {
        self.profile.as_ref()
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }

    /// Message texts in sample order.
    pub fn messages(&self) -> Vec<&str> {
        self.samples.iter().map(|s| s.message.as_str()).collect()
    }

    /// Labels in sample order.
    pub fn labels(&self) -> Vec<Label> {
        self.samples.iter().map(|s| s.label).collect()
    }

    /// Number of samples carrying `label`.
    pub fn count(&self, label: Label) -> usize {
        self.samples.iter().filter(|s| s.label == label).count()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => encoding_rs::WINDOWS_1252
            .decode_without_bom_handling(bytes)
            .0
            .into_owned(),
    }
}
