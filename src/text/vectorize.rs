//! Bag-of-words count vectorizer.
//!
//! Fitting builds a [`Vocabulary`] from the training messages; transforming
//! maps any message onto that vocabulary as a sparse [`FeatureVector`] of
//! token counts. Tokens never seen during fitting are dropped silently.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult, VectorizeError, VectorizeResult};

use super::tokenize::Tokenizer;

// ── VectorizerConfig ───────────────────────────────────────────────────────

/// Tokenization and vocabulary settings for [`CountVectorizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Lowercase tokens before counting.
    pub lowercase: bool,
    /// Minimum token length in characters.
    pub min_token_len: usize,
    /// Minimum number of training documents a token must occur in.
    pub min_df: usize,
    /// Maximum fraction of training documents a token may occur in.
    pub max_df: f64,
    /// Record presence (1) instead of counts.
    pub binary: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            min_token_len: 2,
            min_df: 1,
            max_df: 1.0,
            binary: false,
        }
    }
}

impl VectorizerConfig {
    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new()
            .with_lowercase(self.lowercase)
            .with_min_token_len(self.min_token_len)
    }
}

// ── Vocabulary ─────────────────────────────────────────────────────────────

/// Token → column index mapping, assigned in lexicographic token order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    index: HashMap<String, usize>,
    terms: Vec<String>,
}

impl Vocabulary {
    /// Build from distinct terms; they are sorted before indices are assigned.
    pub fn from_terms<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut terms: Vec<String> = terms.into_iter().collect();
        terms.sort();
        terms.dedup();
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { index, terms }
    }

    pub fn get(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    /// Token stored at a column index.
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    /// All tokens in column order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

// ── FeatureVector ──────────────────────────────────────────────────────────

/// Sparse token-count vector of a fixed width.
///
/// Entries are `(column, count)` pairs sorted by column with no zero counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, u32)>,
}

impl FeatureVector {
    /// All-zero vector of width `dim`.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    /// Build from `(column, count)` pairs in any order.
    ///
    /// Duplicate columns are summed (saturating at `u32::MAX`) and zero
    /// counts dropped. Fails when a column lies outside `0..dim`.
    pub fn from_entries(dim: usize, entries: &[(usize, u32)]) -> ModelResult<Self> {
        let mut merged: BTreeMap<usize, u32> = BTreeMap::new();
        for &(col, count) in entries {
            if col >= dim {
                return Err(ModelError::DimensionMismatch {
                    expected: dim,
                    actual: col.saturating_add(1),
                });
            }
            let slot = merged.entry(col).or_default();
            *slot = slot.saturating_add(count);
        }
        Ok(Self::from_sorted(dim, merged))
    }

    /// Build from a dense slice; its length becomes the width.
    pub fn from_dense(counts: &[u32]) -> Self {
        Self {
            dim: counts.len(),
            entries: counts
                .iter()
                .enumerate()
                .filter(|&(_, &c)| c > 0)
                .map(|(i, &c)| (i, c))
                .collect(),
        }
    }

    fn from_sorted(dim: usize, counts: BTreeMap<usize, u32>) -> Self {
        Self {
            dim,
            entries: counts.into_iter().filter(|&(_, c)| c > 0).collect(),
        }
    }

    /// Width of the vector (the vocabulary size it was built against).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count stored at `column` (zero when absent or out of range).
    pub fn get(&self, column: usize) -> u32 {
        self.entries
            .binary_search_by_key(&column, |&(c, _)| c)
            .map(|i| self.entries[i].1)
            .unwrap_or(0)
    }

    /// Iterate over non-zero `(column, count)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.entries.iter().copied()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|&(_, c)| u64::from(c)).sum()
    }

    pub fn to_dense(&self) -> Vec<u32> {
        let mut dense = vec![0; self.dim];
        for &(col, count) in &self.entries {
            dense[col] = count;
        }
        dense
    }
}

// ── CountMatrix ────────────────────────────────────────────────────────────

/// Rows of [`FeatureVector`]s sharing one width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountMatrix {
    n_features: usize,
    rows: Vec<FeatureVector>,
}

impl CountMatrix {
    /// Assemble a matrix, rejecting rows whose width is not `n_features`.
    pub fn new(n_features: usize, rows: Vec<FeatureVector>) -> ModelResult<Self> {
        if let Some(bad) = rows.iter().find(|r| r.dim() != n_features) {
            return Err(ModelError::DimensionMismatch {
                expected: n_features,
                actual: bad.dim(),
            });
        }
        Ok(Self { n_features, rows })
    }

    /// Assemble from dense rows of width `n_features`.
    pub fn from_dense(n_features: usize, rows: &[Vec<u32>]) -> ModelResult<Self> {
        Self::new(
            n_features,
            rows.iter().map(|r| FeatureVector::from_dense(r)).collect(),
        )
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn rows(&self) -> &[FeatureVector] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&FeatureVector> {
        self.rows.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ── CountVectorizer ────────────────────────────────────────────────────────

/// Learns a vocabulary from training messages and turns messages into
/// token-count vectors over it.
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    config: VectorizerConfig,
    tokenizer: Tokenizer,
    vocabulary: Option<Vocabulary>,
}

impl CountVectorizer {
    pub fn new(config: VectorizerConfig) -> Self {
        Self {
            tokenizer: config.tokenizer(),
            config,
            vocabulary: None,
        }
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// The fitted vocabulary, if any.
    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_ref()
    }

    pub fn is_fitted(&self) -> bool {
        self.vocabulary.is_some()
    }

    /// Build the vocabulary from the training messages.
    ///
    /// Refitting replaces the previous vocabulary. Fails with
    /// [`VectorizeError::EmptyVocabulary`] when no token survives
    /// tokenization and document-frequency filtering; the previous
    /// vocabulary is left untouched in that case.
    pub fn fit<S: AsRef<str>>(&mut self, messages: &[S]) -> VectorizeResult<()> {
        let n_docs = messages.len();

        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for message in messages {
            let unique: HashSet<String> =
                self.tokenizer.tokenize(message.as_ref()).into_iter().collect();
            for token in unique {
                *doc_freq.entry(token).or_insert(0) += 1;
            }
        }

        let seen = doc_freq.len();
        let max_docs = self.config.max_df * n_docs as f64;
        let vocabulary = Vocabulary::from_terms(
            doc_freq
                .into_iter()
                .filter(|&(_, df)| df >= self.config.min_df && df as f64 <= max_docs)
                .map(|(term, _)| term),
        );

        if vocabulary.is_empty() {
            return Err(VectorizeError::EmptyVocabulary { documents: n_docs });
        }

        tracing::debug!(
            documents = n_docs,
            distinct_tokens = seen,
            vocabulary = vocabulary.len(),
            "fitted count vectorizer"
        );
        self.vocabulary = Some(vocabulary);
        Ok(())
    }

    /// Vectorize one message against the fitted vocabulary.
    pub fn transform_one(&self, message: &str) -> VectorizeResult<FeatureVector> {
        let vocabulary = self.vocabulary.as_ref().ok_or(VectorizeError::NotFitted)?;
        Ok(self.count(vocabulary, message))
    }

    /// Vectorize a batch of messages into one row each.
    pub fn transform<S: AsRef<str>>(&self, messages: &[S]) -> VectorizeResult<CountMatrix> {
        let vocabulary = self.vocabulary.as_ref().ok_or(VectorizeError::NotFitted)?;
        let rows = messages
            .iter()
            .map(|m| self.count(vocabulary, m.as_ref()))
            .collect();
        Ok(CountMatrix {
            n_features: vocabulary.len(),
            rows,
        })
    }

    /// [`fit`](Self::fit) followed by [`transform`](Self::transform) on the same messages.
    pub fn fit_transform<S: AsRef<str>>(&mut self, messages: &[S]) -> VectorizeResult<CountMatrix> {
        self.fit(messages)?;
        self.transform(messages)
    }

    fn count(&self, vocabulary: &Vocabulary, message: &str) -> FeatureVector {
        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for token in self.tokenizer.tokenize(message) {
            if let Some(col) = vocabulary.get(&token) {
                let slot = counts.entry(col).or_default();
                if self.config.binary {
                    *slot = 1;
                } else {
                    *slot += 1;
                }
            }
        }
        FeatureVector::from_sorted(vocabulary.len(), counts)
    }
}

impl Default for CountVectorizer {
    fn default() -> Self {
        Self::new(VectorizerConfig::default())
    }
}
