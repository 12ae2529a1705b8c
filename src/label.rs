//! Binary message labels.

use serde::{Deserialize, Serialize};

/// Number of classes the classifier distinguishes.
pub const N_CLASSES: usize = 2;

/// Class of a message: legitimate (`Ham`, index 0) or unsolicited (`Spam`, index 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Ham = 0,
    Spam = 1,
}

impl Label {
    /// Both labels in class-index order.
    pub const ALL: [Label; N_CLASSES] = [Label::Ham, Label::Spam];

    /// Class index: 0 for ham, 1 for spam.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Label::index`]. Any non-zero index maps to spam.
    pub fn from_index(index: usize) -> Self {
        if index == 0 { Self::Ham } else { Self::Spam }
    }

    pub fn is_spam(self) -> bool {
        self == Self::Spam
    }
}

impl From<bool> for Label {
    fn from(is_spam: bool) -> Self {
        if is_spam { Self::Spam } else { Self::Ham }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ham => write!(f, "ham"),
            Self::Spam => write!(f, "spam"),
        }
    }
}
