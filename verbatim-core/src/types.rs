//! Core value types shared by the matcher and the persistent store.

use serde::{Deserialize, Serialize};

use crate::score::{EXACT_SCORE, NO_MATCH_SCORE};

/// Identifier of an original sentence.
///
/// Equal to the entry's append position in the translations table. IDs
/// start at 1 and only grow; 0 is never assigned.
pub type EntryId = u32;

/// Ordered, duplicate-free list of translations of one original sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationSet(Vec<String>);

impl TranslationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding a single translation.
    pub fn single(translation: impl Into<String>) -> Self {
        Self(vec![translation.into()])
    }

    /// Append `translation` unless an identical text is already present.
    ///
    /// Returns `true` if the set changed.
    pub fn push_unique(&mut self, translation: &str) -> bool {
        if self.contains(translation) {
            return false;
        }
        self.0.push(translation.to_owned());
        true
    }

    pub fn contains(&self, translation: &str) -> bool {
        self.0.iter().any(|t| t == translation)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for TranslationSet {
    /// Builds a set, dropping repeated texts while keeping first occurrences.
    fn from(translations: Vec<String>) -> Self {
        let mut set = Self::new();
        for t in &translations {
            set.push_unique(t);
        }
        set
    }
}

/// Result of a lookup: a score and every translation found at that score.
///
/// Exact matches score 100 and set `exact`. Fuzzy hits keep their tier
/// score, which some parameters push to 100 as well. 0 means nothing was
/// found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    pub score: u32,
    pub translations: Vec<String>,
    /// Set only for byte-identical matches of the original.
    #[serde(default)]
    pub exact: bool,
}

impl Suggestions {
    pub fn none() -> Self {
        Self {
            score: NO_MATCH_SCORE,
            translations: Vec::new(),
            exact: false,
        }
    }

    pub fn exact(set: TranslationSet) -> Self {
        Self {
            score: EXACT_SCORE,
            translations: set.into_vec(),
            exact: true,
        }
    }

    /// Approximate hit at `score`.
    pub fn fuzzy(score: u32, translations: Vec<String>) -> Self {
        Self {
            score,
            translations,
            exact: false,
        }
    }

    pub fn is_exact(&self) -> bool {
        self.exact
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }

    /// First translation of the result, the one auto-fill uses.
    pub fn best(&self) -> Option<&str> {
        self.translations.first().map(String::as_str)
    }
}
