//! Filling the memory from existing catalogs.
//!
//! Only finished work is learned: untranslated and fuzzy items are skipped.
//! The first failing store aborts the import.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogItem};
use crate::error::Result;
use crate::lang::language_matches;
use crate::memory::TranslationMemory;

/// Progress reporting for long imports.
pub trait Progress {
    fn set_total(&mut self, _total: usize) {}

    fn message(&mut self, _message: &str) {}

    /// One unit of work finished.
    fn advance(&mut self) {}

    /// Polled between units; `true` stops the import.
    fn cancelled(&self) -> bool {
        false
    }
}

/// Progress sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    pub stored: usize,
    pub skipped: usize,
    pub cancelled: bool,
}

impl ImportStats {
    fn add(&mut self, other: ImportStats) {
        self.stored += other.stored;
        self.skipped += other.skipped;
    }
}

/// Store every translated, non-fuzzy item.
pub fn import_catalog<'a, I>(
    tm: &TranslationMemory,
    items: impl IntoIterator<Item = &'a I>,
) -> Result<ImportStats>
where
    I: CatalogItem + 'a,
{
    let mut stats = ImportStats::default();
    for item in items {
        if !item.is_translated() || item.is_fuzzy() {
            stats.skipped += 1;
            continue;
        }
        tm.store(item.source(), item.translation())?;
        stats.stored += 1;
    }
    Ok(stats)
}

/// Imports several catalogs, one progress step each.
pub struct Updater<'a, P: Progress = NoProgress> {
    tm: &'a TranslationMemory,
    progress: P,
}

impl<'a> Updater<'a, NoProgress> {
    pub fn new(tm: &'a TranslationMemory) -> Self {
        Self::with_progress(tm, NoProgress)
    }
}

impl<'a, P: Progress> Updater<'a, P> {
    pub fn with_progress(tm: &'a TranslationMemory, progress: P) -> Self {
        Self { tm, progress }
    }

    pub fn progress(&self) -> &P {
        &self.progress
    }

    /// Import `catalogs` in order.
    ///
    /// Catalogs tagged with a language unrelated to the memory's are skipped
    /// without counting their items.
    pub fn update(&mut self, catalogs: &[Catalog]) -> Result<ImportStats> {
        let mut total = ImportStats::default();
        self.progress.set_total(catalogs.len());

        for catalog in catalogs {
            self.progress.message(&format!("Scanning catalog: {}", catalog.name));

            let related = catalog
                .language
                .as_deref()
                .is_none_or(|lang| language_matches(lang, self.tm.language()));
            if related {
                total.add(import_catalog(self.tm, &catalog.entries)?);
            } else {
                log::debug!(
                    "Skipping catalog '{}' in {:?} for TM '{}'",
                    catalog.name,
                    catalog.language,
                    self.tm.language()
                );
            }

            self.progress.advance();
            if self.progress.cancelled() {
                total.cancelled = true;
                break;
            }
        }

        log::info!(
            "TM '{}' updated: {} stored, {} skipped{}",
            self.tm.language(),
            total.stored,
            total.skipped,
            if total.cancelled { " (cancelled)" } else { "" }
        );
        Ok(total)
    }
}
