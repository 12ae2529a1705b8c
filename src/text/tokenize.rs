//! Word tokenizer shared by fitting and transforming.
//!
//! A token is a maximal run of Unicode word characters (`\w+`). Tokens are
//! lowercased unless configured otherwise, and tokens shorter than
//! `min_token_len` characters are dropped. With the defaults this matches
//! the usual `\b\w\w+\b` bag-of-words rule: punctuation splits tokens and
//! single letters such as "a" or "I" are ignored.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static RE_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Splits messages into normalized word tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokenizer {
    lowercase: bool,
    min_token_len: usize,
}

impl Tokenizer {
    /// Lowercasing tokenizer keeping tokens of two or more characters.
    pub fn new() -> Self {
        Self {
            lowercase: true,
            min_token_len: 2,
        }
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Minimum token length in characters (values below 1 are treated as 1).
    pub fn with_min_token_len(mut self, len: usize) -> Self {
        self.min_token_len = len.max(1);
        self
    }

    pub fn lowercase(&self) -> bool {
        self.lowercase
    }

    pub fn min_token_len(&self) -> usize {
        self.min_token_len
    }

    /// Tokenize a message in order of appearance, duplicates included.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        RE_WORD
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|word| word.chars().count() >= self.min_token_len)
            .map(|word| {
                if self.lowercase {
                    word.to_lowercase()
                } else {
                    word.to_string()
                }
            })
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
