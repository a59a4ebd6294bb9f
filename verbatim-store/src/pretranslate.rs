//! Filling untranslated catalog items from the memory.

use serde::{Deserialize, Serialize};

use crate::catalog::TranslatableItem;
use crate::error::Result;
use crate::memory::TranslationMemory;

/// Minimum score of the "good quality only" preset.
pub const GOOD_QUALITY_SCORE: u32 = 80;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PretranslateOptions {
    /// Apply exact matches only.
    pub only_exact: bool,
    /// Ignore results scoring below this.
    pub min_score: u32,
    /// Leave exact matches unflagged instead of marking them fuzzy.
    pub exact_not_fuzzy: bool,
}

impl PretranslateOptions {
    pub fn good_quality() -> Self {
        Self {
            min_score: GOOD_QUALITY_SCORE,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PretranslateStats {
    pub exact: usize,
    pub fuzzy: usize,
}

impl PretranslateStats {
    pub fn total(&self) -> usize {
        self.exact + self.fuzzy
    }
}

/// Pre-translate every untranslated or fuzzy singular item in `items`.
///
/// The first translation of the lookup result is applied. Items are marked
/// fuzzy unless the match was exact and `exact_not_fuzzy` is set.
pub fn pretranslate<'a, I>(
    tm: &TranslationMemory,
    items: impl IntoIterator<Item = &'a mut I>,
    options: &PretranslateOptions,
) -> Result<PretranslateStats>
where
    I: TranslatableItem + 'a,
{
    let mut stats = PretranslateStats::default();

    for item in items {
        if item.has_plural() {
            continue;
        }
        if item.is_translated() && !item.is_fuzzy() {
            continue;
        }

        let result = tm.lookup(item.source())?;
        let Some(best) = result.best() else {
            continue;
        };
        let exact = result.is_exact();
        if options.only_exact && !exact {
            continue;
        }
        if result.score < options.min_score {
            continue;
        }

        item.apply_pretranslation(best, !exact || !options.exact_not_fuzzy);
        if exact {
            stats.exact += 1;
        } else {
            stats.fuzzy += 1;
        }
    }

    log::info!(
        "Pre-translated {} items from TM '{}' ({} exact)",
        stats.total(),
        tm.language(),
        stats.exact
    );
    Ok(stats)
}
