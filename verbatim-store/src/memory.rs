//! Per-language translation-memory handle.
//!
//! A [`TranslationMemory`] is a cheap clone around one open
//! [`TableStore`]. Handles for the same directory share the store; the
//! store closes when the last handle is dropped, and the shared
//! [`Environment`] goes away after the last store.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use verbatim_core::{fuzzy_search, tokenize, EntryId, FuzzyParams, Suggestions, TranslationSet};

use crate::env::Environment;
use crate::error::{Result, TmError};
use crate::storage::{TableStore, CF_TRANSLATIONS};

/// One open store and the environment it was opened in.
///
/// Field order matters: the store must close before the environment
/// removes its runtime directory.
pub(crate) struct Shared {
    pub(crate) store: TableStore,
    pub(crate) env: Arc<Environment>,
}

/// Summary of one language store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmStats {
    pub language: String,
    pub entries: u32,
    pub disk_bytes: u64,
}

/// An original sentence with everything stored for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub id: EntryId,
    pub original: String,
    pub translations: Vec<String>,
}

#[derive(Clone)]
pub struct TranslationMemory {
    shared: Arc<Shared>,
    language: String,
    params: FuzzyParams,
}

impl TranslationMemory {
    pub(crate) fn new(shared: Arc<Shared>, language: &str, params: FuzzyParams) -> Self {
        Self {
            shared,
            language: language.to_owned(),
            params,
        }
    }

    /// Language tag this handle was opened with.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Directory of the underlying store.
    pub fn db_path(&self) -> &Path {
        self.shared.store.path()
    }

    pub fn params(&self) -> FuzzyParams {
        self.params
    }

    /// Change the fuzziness of this handle only.
    pub fn set_params(&mut self, params: FuzzyParams) {
        self.params = params;
    }

    /// Whether two handles share one open store.
    pub fn shares_store_with(&self, other: &TranslationMemory) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Runtime directory of the environment this handle keeps alive.
    pub fn runtime_dir(&self) -> &Path {
        self.shared.env.runtime_dir()
    }

    // ─── Store ────────────────────────────────────────────────────────

    /// Remember that `original` translates to `translation`.
    ///
    /// A new original gets the next ID and is indexed by its words; a known
    /// one gets `translation` appended unless it is already there. Either
    /// way the change is committed in one atomic write.
    pub fn store(&self, original: &str, translation: &str) -> Result<()> {
        let mut batch = self.shared.store.batch();

        if let Some(id) = batch.store().original_id(original)? {
            let mut set = batch.store().translations(id)?.ok_or_else(|| {
                TmError::corrupt(CF_TRANSLATIONS, format!("entry {id} has no translations"))
            })?;
            if set.push_unique(translation) {
                batch.put_translations(id, &set)?;
                batch.commit()?;
            }
            return Ok(());
        }

        let id = batch.append_translations(&TranslationSet::single(translation))?;
        batch.put_original(original, id)?;

        let words = tokenize(original);
        let sentence_len = words.len() as u32;
        for word in &words {
            batch.append_posting(word, sentence_len, id)?;
        }
        batch.commit()?;

        log::trace!("[{}] stored entry {id} ({sentence_len} words)", self.language);
        Ok(())
    }

    /// [`store`](Self::store) for callers that treat the memory as optional.
    pub fn store_or_log(&self, original: &str, translation: &str) -> bool {
        match self.store(original, translation) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Translation memory database error: {e}");
                false
            }
        }
    }

    // ─── Lookup ───────────────────────────────────────────────────────

    /// Exact match if there is one, otherwise the best fuzzy tier.
    pub fn lookup(&self, query: &str) -> Result<Suggestions> {
        if let Some(exact) = self.lookup_exact(query)? {
            return Ok(exact);
        }

        let words = tokenize(query);
        let Some(hit) = fuzzy_search(&words, &self.params, &self.shared.store)? else {
            return Ok(Suggestions::none());
        };

        let mut translations = Vec::new();
        for id in &hit.ids {
            match self.shared.store.translations(*id)? {
                Some(set) => translations.extend(set.into_vec()),
                None => log::warn!("[{}] entry {id} is indexed but has no translations", self.language),
            }
        }
        if translations.is_empty() {
            return Ok(Suggestions::none());
        }

        Ok(Suggestions::fuzzy(hit.score, translations))
    }

    /// Byte-identical match of `query`, score 100.
    pub fn lookup_exact(&self, query: &str) -> Result<Option<Suggestions>> {
        let Some(id) = self.shared.store.original_id(query)? else {
            return Ok(None);
        };
        match self.shared.store.translations(id)? {
            Some(set) => Ok(Some(Suggestions::exact(set))),
            None => {
                log::warn!(
                    "[{}] original maps to entry {id} without translations, falling back to fuzzy search",
                    self.language
                );
                Ok(None)
            }
        }
    }

    /// [`lookup`](Self::lookup) that reports errors as "no match".
    pub fn lookup_or_log(&self, query: &str) -> Suggestions {
        self.lookup(query).unwrap_or_else(|e| {
            log::error!("Translation memory database error: {e}");
            Suggestions::none()
        })
    }

    // ─── Inspection ───────────────────────────────────────────────────

    pub fn stats(&self) -> Result<TmStats> {
        Ok(TmStats {
            language: self.language.clone(),
            entries: self.shared.store.entry_count(),
            disk_bytes: self.shared.store.disk_usage()?,
        })
    }

    /// Every stored entry in ID order.
    pub fn entries(&self) -> Result<Vec<StoredEntry>> {
        let store = &self.shared.store;
        store
            .originals()?
            .into_iter()
            .map(|(id, original)| {
                let translations = store
                    .translations(id)?
                    .ok_or_else(|| {
                        TmError::corrupt(CF_TRANSLATIONS, format!("entry {id} has no translations"))
                    })?
                    .into_vec();
                Ok(StoredEntry {
                    id,
                    original,
                    translations,
                })
            })
            .collect()
    }

    /// Posting list of `word` in originals of `sentence_len` words.
    pub fn postings(&self, word: &str, sentence_len: u32) -> Result<Option<Vec<EntryId>>> {
        self.shared.store.postings(word, sentence_len)
    }

    /// Flush pending writes to disk.
    pub fn sync(&self) -> Result<()> {
        self.shared.store.sync()
    }

    /// Flush and drop this handle.
    pub fn release(self) -> Result<()> {
        self.sync()
    }
}

impl std::fmt::Debug for TranslationMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationMemory")
            .field("language", &self.language)
            .field("db_path", &self.db_path())
            .field("params", &self.params)
            .finish()
    }
}
