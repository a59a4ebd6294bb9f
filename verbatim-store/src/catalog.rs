//! Boundary to translation catalogs.
//!
//! The memory never parses catalog files. Callers expose their items through
//! [`CatalogItem`] (read side, used by import) and [`TranslatableItem`]
//! (write side, used by pre-translation). [`CatalogEntry`] and [`Catalog`]
//! are a plain serde model for callers without a catalog type of their own.

use serde::{Deserialize, Serialize};

pub trait CatalogItem {
    /// Source text.
    fn source(&self) -> &str;

    /// Singular translation; empty when untranslated.
    fn translation(&self) -> &str;

    /// Marked as needing review.
    fn is_fuzzy(&self) -> bool;

    fn has_plural(&self) -> bool {
        false
    }

    fn is_translated(&self) -> bool {
        !self.translation().is_empty()
    }
}

pub trait TranslatableItem: CatalogItem {
    /// Fill in a translation found in the memory.
    fn apply_pretranslation(&mut self, translation: &str, fuzzy: bool);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogEntry {
    pub source: String,
    pub translation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,
    pub fuzzy: bool,
    /// Set when the translation came from pre-translation.
    pub pretranslated: bool,
}

impl CatalogEntry {
    pub fn new(source: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            translation: translation.into(),
            ..Self::default()
        }
    }

    pub fn untranslated(source: impl Into<String>) -> Self {
        Self::new(source, "")
    }

    pub fn fuzzy(mut self) -> Self {
        self.fuzzy = true;
        self
    }

    pub fn with_plural(mut self, plural: impl Into<String>) -> Self {
        self.plural = Some(plural.into());
        self
    }
}

impl CatalogItem for CatalogEntry {
    fn source(&self) -> &str {
        &self.source
    }

    fn translation(&self) -> &str {
        &self.translation
    }

    fn is_fuzzy(&self) -> bool {
        self.fuzzy
    }

    fn has_plural(&self) -> bool {
        self.plural.is_some()
    }
}

impl TranslatableItem for CatalogEntry {
    fn apply_pretranslation(&mut self, translation: &str, fuzzy: bool) {
        self.translation = translation.to_owned();
        self.fuzzy = fuzzy;
        self.pretranslated = true;
    }
}

/// A named list of entries in one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(name: impl Into<String>, entries: Vec<CatalogEntry>) -> Self {
        Self {
            name: name.into(),
            language: None,
            entries,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}
