//! RocksDB-backed table store for one language.
//!
//! Column families:
//! - `originals`    — original sentence → entry ID
//! - `translations` — entry ID → translation list (bincode)
//! - `words`        — (sentence length, word) → concatenated entry IDs,
//!                    appended through an associative merge operator
//!
//! Writes go through a [`StoreBatch`], which holds the writer lock, stages
//! puts and merges in one `WriteBatch`, and advances the ID sequence only
//! once the batch has been committed.

use rocksdb::{
    BlockBasedOptions, Cache, ColumnFamily, ColumnFamilyDescriptor, DBCompressionType,
    DBRecoveryMode, DBWithThreadMode, IteratorMode, Options, SingleThreaded, WriteBatch,
    WriteOptions,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use verbatim_core::{EntryId, PostingSource, TranslationSet};

use super::codec;
use crate::env::Environment;
use crate::error::{Result, TmError};

pub const CF_ORIGINALS: &str = "originals";
pub const CF_TRANSLATIONS: &str = "translations";
pub const CF_WORDS: &str = "words";

const TABLES: [&str; 3] = [CF_ORIGINALS, CF_TRANSLATIONS, CF_WORDS];

/// Name the word-index merge operator is registered under.
const MERGE_OPERATOR: &str = "verbatim.concat_ids";

/// Engine tuning shared by every language store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Shared block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Bloom filter bits per key (default: 10)
    pub bloom_filter_bits: i32,
    /// fsync every committed store (default: false)
    pub sync_writes: bool,
    /// Max open files per store (default: 256)
    pub max_open_files: i32,
    /// Write buffer size per column family (default: 8MB)
    pub write_buffer_size: usize,
    /// Info log files kept per store (default: 2)
    pub keep_log_file_num: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            block_cache_size: 64 * 1024 * 1024,
            bloom_filter_bits: 10,
            sync_writes: false,
            max_open_files: 256,
            write_buffer_size: 8 * 1024 * 1024,
            keep_log_file_num: 2,
        }
    }
}

impl StoreConfig {
    /// Small caches for tests.
    pub fn for_testing() -> Self {
        Self {
            block_cache_size: 4 * 1024 * 1024,
            bloom_filter_bits: 10,
            sync_writes: false,
            max_open_files: 64,
            write_buffer_size: 1024 * 1024,
            keep_log_file_num: 1,
        }
    }
}

/// The three tables of one language directory.
pub struct TableStore {
    db: DBWithThreadMode<SingleThreaded>,
    path: PathBuf,
    sync_writes: bool,
    /// ID the next new entry gets. Locked for the lifetime of a batch.
    next_id: Mutex<EntryId>,
}

impl TableStore {
    /// Open (or create) the store in `path`.
    pub fn open(path: &Path, config: &StoreConfig, env: &Environment) -> Result<Self> {
        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);
        db_opts.set_env(env.env());
        db_opts.set_db_log_dir(env.runtime_dir());
        db_opts.set_keep_log_file_num(config.keep_log_file_num);
        db_opts.set_max_open_files(config.max_open_files);
        db_opts.set_wal_recovery_mode(DBRecoveryMode::PointInTime);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = TABLES
            .iter()
            .map(|&name| ColumnFamilyDescriptor::new(name, Self::cf_options(name, config, env.cache())))
            .collect();

        let db = DBWithThreadMode::<SingleThreaded>::open_cf_descriptors(&db_opts, path, cf_descriptors)?;
        let next_id = Self::recover_next_id(&db)?;

        log::info!(
            "Opened TM store {} ({} entries)",
            path.display(),
            next_id - 1
        );

        Ok(Self {
            db,
            path: path.to_path_buf(),
            sync_writes: config.sync_writes,
            next_id: Mutex::new(next_id),
        })
    }

    fn cf_options(name: &str, config: &StoreConfig, cache: &Cache) -> Options {
        let mut opts = Options::default();

        let mut block_opts = BlockBasedOptions::default();
        block_opts.set_block_cache(cache);
        block_opts.set_bloom_filter(config.bloom_filter_bits as f64, false);
        opts.set_block_based_table_factory(&block_opts);

        opts.set_compression_type(DBCompressionType::Lz4);
        opts.set_write_buffer_size(config.write_buffer_size);

        if name == CF_WORDS {
            opts.set_merge_operator_associative(MERGE_OPERATOR, codec::concat_merge);
        }

        opts
    }

    /// One past the highest ID in the translations table, or 1 when empty.
    fn recover_next_id(db: &DBWithThreadMode<SingleThreaded>) -> Result<EntryId> {
        let cf = db
            .cf_handle(CF_TRANSLATIONS)
            .ok_or(TmError::MissingTable(CF_TRANSLATIONS))?;

        match db.iterator_cf(cf, IteratorMode::End).next() {
            Some(item) => {
                let (key, _) = item?;
                Ok(codec::decode_id(CF_TRANSLATIONS, &key)? + 1)
            }
            None => Ok(1),
        }
    }

    fn cf(&self, name: &'static str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or(TmError::MissingTable(name))
    }

    fn lock_next_id(&self) -> MutexGuard<'_, EntryId> {
        self.next_id.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ─── Reads ────────────────────────────────────────────────────────

    /// ID of `original`, matched byte for byte.
    pub fn original_id(&self, original: &str) -> Result<Option<EntryId>> {
        let cf = self.cf(CF_ORIGINALS)?;
        match self.db.get_pinned_cf(cf, original.as_bytes())? {
            Some(bytes) => Ok(Some(codec::decode_id(CF_ORIGINALS, &bytes)?)),
            None => Ok(None),
        }
    }

    pub fn translations(&self, id: EntryId) -> Result<Option<TranslationSet>> {
        let cf = self.cf(CF_TRANSLATIONS)?;
        match self.db.get_pinned_cf(cf, codec::encode_id(id))? {
            Some(bytes) => Ok(Some(codec::decode_translations(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Posting list of `word` in sentences of `sentence_len` words.
    pub fn postings(&self, word: &str, sentence_len: u32) -> Result<Option<Vec<EntryId>>> {
        let cf = self.cf(CF_WORDS)?;
        match self.db.get_cf(cf, codec::word_key(word, sentence_len))? {
            Some(bytes) => Ok(Some(codec::decode_postings(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Every `(id, original)` pair, in ID order.
    pub fn originals(&self) -> Result<Vec<(EntryId, String)>> {
        let cf = self.cf(CF_ORIGINALS)?;
        let mut entries = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (key, value) = item?;
            let original = String::from_utf8(key.into_vec())
                .map_err(|e| TmError::corrupt(CF_ORIGINALS, e.to_string()))?;
            entries.push((codec::decode_id(CF_ORIGINALS, &value)?, original));
        }
        entries.sort_unstable_by_key(|(id, _)| *id);
        Ok(entries)
    }

    /// Number of entries ever stored.
    pub fn entry_count(&self) -> u32 {
        *self.lock_next_id() - 1
    }

    /// Total size of the files in the store directory.
    pub fn disk_usage(&self) -> Result<u64> {
        let mut total = 0;
        for entry in std::fs::read_dir(&self.path)? {
            let meta = entry?.metadata()?;
            if meta.is_file() {
                total += meta.len();
            }
        }
        Ok(total)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // ─── Writes ───────────────────────────────────────────────────────

    /// Start a write. Concurrent writers wait here until the batch is dropped.
    pub fn batch(&self) -> StoreBatch<'_> {
        StoreBatch {
            store: self,
            batch: WriteBatch::default(),
            next_id: self.lock_next_id(),
            allocated: 0,
        }
    }

    /// Flush memtables and the WAL to disk.
    pub fn sync(&self) -> Result<()> {
        for name in TABLES {
            self.db.flush_cf(self.cf(name)?)?;
        }
        self.db.flush_wal(true)?;
        Ok(())
    }
}

impl PostingSource for TableStore {
    type Error = TmError;

    fn postings(&self, word: &str, sentence_len: u32) -> Result<Option<Vec<EntryId>>> {
        TableStore::postings(self, word, sentence_len)
    }
}

impl std::fmt::Debug for TableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Staged writes against one [`TableStore`].
///
/// Dropping the batch without [`commit`](StoreBatch::commit) discards it and
/// releases any IDs it allocated.
pub struct StoreBatch<'a> {
    store: &'a TableStore,
    batch: WriteBatch,
    next_id: MutexGuard<'a, EntryId>,
    allocated: u32,
}

impl<'a> StoreBatch<'a> {
    /// Read through to the committed store while holding the writer lock.
    pub fn store(&self) -> &'a TableStore {
        self.store
    }

    /// Stage `set` under a fresh ID and return the ID.
    pub fn append_translations(&mut self, set: &TranslationSet) -> Result<EntryId> {
        let id = *self.next_id + self.allocated;
        self.put_translations(id, set)?;
        self.allocated += 1;
        Ok(id)
    }

    pub fn put_translations(&mut self, id: EntryId, set: &TranslationSet) -> Result<()> {
        let cf = self.store.cf(CF_TRANSLATIONS)?;
        self.batch
            .put_cf(cf, codec::encode_id(id), codec::encode_translations(set)?);
        Ok(())
    }

    pub fn put_original(&mut self, original: &str, id: EntryId) -> Result<()> {
        let cf = self.store.cf(CF_ORIGINALS)?;
        self.batch.put_cf(cf, original.as_bytes(), codec::encode_id(id));
        Ok(())
    }

    /// Append `id` to the posting list of `(word, sentence_len)`.
    pub fn append_posting(&mut self, word: &str, sentence_len: u32, id: EntryId) -> Result<()> {
        let cf = self.store.cf(CF_WORDS)?;
        self.batch
            .merge_cf(cf, codec::word_key(word, sentence_len), codec::encode_id(id));
        Ok(())
    }

    /// Stage arbitrary bytes, for tests that need a damaged store.
    #[cfg(test)]
    pub(crate) fn put_raw(&mut self, table: &'static str, key: &[u8], value: &[u8]) -> Result<()> {
        let cf = self.store.cf(table)?;
        self.batch.put_cf(cf, key, value);
        Ok(())
    }

    /// Write everything atomically. The ID sequence moves only on success.
    pub fn commit(mut self) -> Result<()> {
        let batch = std::mem::take(&mut self.batch);
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.store.sync_writes);
        self.store.db.write_opt(batch, &write_opts)?;
        *self.next_id += self.allocated;
        Ok(())
    }
}
