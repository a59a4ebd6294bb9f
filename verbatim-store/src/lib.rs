//! # verbatim-store — Persistent translation memory
//!
//! RocksDB-backed stores, one per language, behind a [`Registry`] owned by
//! the application.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────┐  open(lang)   ┌──────────────────────┐
//!   │ Registry     │ ────────────► │ TranslationMemory    │ (cheap clones)
//!   │ (TmConfig)   │               │  store() / lookup()  │
//!   └──────┬───────┘               └──────────┬───────────┘
//!          │ resolve <root>/<lang>            │
//!          ▼                                  ▼
//!   ┌──────────────┐               ┌──────────────────────┐
//!   │ Environment  │ ◄──────────── │ TableStore (RocksDB) │
//!   │ Env + cache  │   shared by   │ originals            │
//!   │ <root>/.runtime  every store │ translations         │
//!   └──────────────┘               │ words                │
//!                                  └──────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`registry`] — opens and shares stores, legacy migration
//! - [`memory`] — the per-language handle
//! - [`storage`] — column families, byte layouts, atomic batches
//! - [`env`] — runtime environment shared by all stores
//! - [`lang`] — language tag → directory resolution
//! - [`catalog`], [`import`], [`pretranslate`] — catalog collaborators
//! - [`migrate`] — moving stores out of an old root
//! - [`config`] — `TmConfig`

pub mod catalog;
pub mod config;
pub mod env;
pub mod error;
pub mod import;
pub mod lang;
pub mod memory;
pub mod migrate;
pub mod pretranslate;
pub mod registry;
pub mod storage;

// Re-exports for convenience
pub use catalog::{Catalog, CatalogEntry, CatalogItem, TranslatableItem};
pub use config::{default_database_dir, TmConfig};
pub use env::Environment;
pub use error::{Result, TmError};
pub use import::{import_catalog, ImportStats, NoProgress, Progress, Updater};
pub use lang::{discover_languages, language_matches, resolve_language_dir};
pub use memory::{StoredEntry, TmStats, TranslationMemory};
pub use migrate::MigrationReport;
pub use pretranslate::{pretranslate, PretranslateOptions, PretranslateStats, GOOD_QUALITY_SCORE};
pub use registry::Registry;
pub use storage::{StoreConfig, TableStore};

pub use verbatim_core::{FuzzyParams, Suggestions};
