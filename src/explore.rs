//! Textual exploration of a labeled dataset: size, duplicates, class
//! balance and the most frequent words of spam messages.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::dataset::{ColumnProfile, Dataset};
use crate::label::Label;
use crate::text::stopwords;

/// Exploration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExploreConfig {
    /// How many frequent spam words to report.
    pub top_words: usize,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self { top_words: 20 }
    }
}

/// Size and share of one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassShare {
    pub label: Label,
    pub count: usize,
    /// Share of all rows, in percent.
    pub percent: f64,
}

/// A word and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Summary statistics of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub rows: usize,
    /// Raw CSV columns with their missing and distinct counts; empty for
    /// datasets built in memory.
    pub columns: Vec<ColumnProfile>,
    /// Rows whose message and label already appeared earlier.
    pub duplicates: usize,
    pub unique_messages: usize,
    /// One entry per class, ham first.
    pub classes: Vec<ClassShare>,
    /// Most frequent spam words, stop words removed, most frequent first.
    pub top_spam_words: Vec<WordCount>,
}

impl DatasetSummary {
    pub fn class(&self, label: Label) -> Option<&ClassShare> {
        self.classes.iter().find(|c| c.label == label)
    }
}

/// Summarize `dataset`, keeping the `top_n` most frequent spam words.
pub fn summarize(dataset: &Dataset, top_n: usize) -> DatasetSummary {
    let rows = dataset.len();

    let mut seen = HashSet::new();
    let duplicates = dataset
        .samples()
        .iter()
        .filter(|s| !seen.insert((s.message.as_str(), s.label)))
        .count();
    let unique_messages = dataset
        .samples()
        .iter()
        .map(|s| s.message.as_str())
        .collect::<HashSet<_>>()
        .len();

    let classes = Label::ALL
        .iter()
        .map(|&label| {
            let count = dataset.count(label);
            let percent = if rows == 0 {
                0.0
            } else {
                100.0 * count as f64 / rows as f64
            };
            ClassShare {
                label,
                count,
                percent,
            }
        })
        .collect();

    let spam_messages = dataset
        .samples()
        .iter()
        .filter(|s| s.label.is_spam())
        .map(|s| s.message.as_str());

    DatasetSummary {
        rows,
        columns: dataset
            .profile()
            .map(|p| p.columns.clone())
            .unwrap_or_default(),
        duplicates,
        unique_messages,
        classes,
        top_spam_words: top_words(spam_messages, top_n),
    }
}

/// Count content words over `messages` and return the `top_n` most frequent.
///
/// Words are lowercased whitespace tokens with surrounding punctuation
/// trimmed. Stop words, single characters and pure numbers are skipped.
/// Ties are broken alphabetically.
pub fn top_words<'a, I>(messages: I, top_n: usize) -> Vec<WordCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for message in messages {
        for raw in message.split_whitespace() {
            let word = raw
                .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .trim_matches('\'')
                .to_lowercase();
            if word.chars().count() < 2
                || word.chars().all(|c| c.is_numeric())
                || stopwords::is_stop_word(&word)
            {
                continue;
            }
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    let mut words: Vec<WordCount> = counts
        .into_iter()
        .map(|(word, count)| WordCount { word, count })
        .collect();
    words.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    words.truncate(top_n);
    words
}

impl std::fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "rows:            {}", self.rows)?;
        writeln!(f, "duplicates:      {}", self.duplicates)?;
        writeln!(f, "unique messages: {}", self.unique_messages)?;
        if !self.columns.is_empty() {
            writeln!(f, "columns:         {}", self.columns.len())?;
            writeln!(f)?;
            writeln!(f, "  {:<15} {:>8} {:>8}", "column", "missing", "unique")?;
            for c in &self.columns {
                let name = if c.name.is_empty() { "(unnamed)" } else { c.name.as_str() };
                writeln!(f, "  {:<15} {:>8} {:>8}", name, c.missing, c.unique)?;
            }
        }
        writeln!(f)?;
        writeln!(f, "class balance:")?;
        for c in &self.classes {
            writeln!(f, "  {:<5} {:>7} ({:>5.1}%)", c.label.to_string(), c.count, c.percent)?;
        }
        if !self.top_spam_words.is_empty() {
            writeln!(f)?;
            writeln!(f, "most frequent spam words:")?;
            for w in &self.top_spam_words {
                writeln!(f, "  {:<15} {:>6}", w.word, w.count)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetConfig;
    use Label::{Ham, Spam};

    fn sample() -> Dataset {
        Dataset::from_pairs([
            ("WIN a FREE prize now!", Spam),
            ("Free entry: call 08712 now", Spam),
            ("see you at lunch", Ham),
            ("see you at lunch", Ham),
            ("see you at lunch", Spam),
        ])
    }

    #[test]
    fn counts_rows_and_duplicates() {
        let s = summarize(&sample(), 10);
        assert_eq!(s.rows, 5);
        assert_eq!(s.duplicates, 1);
        assert_eq!(s.unique_messages, 3);
    }

    #[test]
    fn class_balance() {
        let s = summarize(&sample(), 10);
        let spam = s.class(Spam).unwrap();
        assert_eq!(spam.count, 3);
        assert!((spam.percent - 60.0).abs() < 1e-9);
        assert_eq!(s.class(Ham).unwrap().count, 2);
        assert_eq!(s.classes[0].label, Ham);
    }

    #[test]
    fn top_spam_words_skip_stop_words_and_numbers() {
        let s = summarize(&sample(), 3);
        let words: Vec<(&str, usize)> = s
            .top_spam_words
            .iter()
            .map(|w| (w.word.as_str(), w.count))
            .collect();
        assert_eq!(words, vec![("free", 2), ("now", 2), ("call", 1)]);
    }

    #[test]
    fn loaded_dataset_reports_columns() {
        let csv = "v1,v2,\nham,see you,\nspam,free prize,\nham,see you,\n";
        let ds = Dataset::from_csv_reader(csv.as_bytes(), &DatasetConfig::default()).unwrap();
        let s = summarize(&ds, 5);
        assert_eq!(s.columns.len(), 3);
        assert_eq!(s.columns[1].unique, 2);
        assert_eq!(s.columns[2].missing, 3);

        let text = s.to_string();
        assert!(text.contains("columns:         3"));
        assert!(text.contains("(unnamed)"));
    }

    #[test]
    fn in_memory_dataset_has_no_columns() {
        assert!(summarize(&sample(), 5).columns.is_empty());
    }

    #[test]
    fn empty_dataset_summary() {
        let s = summarize(&Dataset::default(), 5);
        assert_eq!(s.rows, 0);
        assert!(s.classes.iter().all(|c| c.count == 0 && c.percent == 0.0));
        assert!(s.top_spam_words.is_empty());
    }

    #[test]
    fn display_lists_classes() {
        let text = summarize(&sample(), 2).to_string();
        assert!(text.contains("rows:            5"));
        assert!(text.contains("spam"));
        assert!(text.contains("free"));
    }
}
