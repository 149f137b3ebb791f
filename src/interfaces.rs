// Definitions that are used throughout all modules

use serde::{Deserialize, Serialize};

use crate::config::{FRIEDEL_MINUS_SUFFIX, FRIEDEL_PLUS_SUFFIX};

/// Whether a dataset holds one row per unique reflection or one row per observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MergeState {
    Merged,
    Unmerged,
}

impl MergeState {
    pub fn is_merged(self) -> bool {
        matches!(self, MergeState::Merged)
    }
}

// Friedel branch selected by the parity of ISYM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FriedelBranch {
    Plus,
    Minus,
}

impl FriedelBranch {
    /// Odd ISYM values are Friedel-plus, even values Friedel-minus.
    pub fn from_isym(isym: i32) -> Self {
        if isym % 2 == 1 {
            FriedelBranch::Plus
        } else {
            FriedelBranch::Minus
        }
    }
}

/// Label suffixes used for the two-column anomalous layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalousSuffixes {
    pub plus: String,
    pub minus: String,
}

impl AnomalousSuffixes {
    pub fn new(plus: impl Into<String>, minus: impl Into<String>) -> Self {
        Self {
            plus: plus.into(),
            minus: minus.into(),
        }
    }
}

impl Default for AnomalousSuffixes {
    fn default() -> Self {
        Self::new(FRIEDEL_PLUS_SUFFIX, FRIEDEL_MINUS_SUFFIX)
    }
}
