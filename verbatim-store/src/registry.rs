//! Owner of every open translation memory under one database root.
//!
//! ```text
//!   Registry ──► instances: dir ─► Weak<Shared> ─┐
//!            └─► env: Weak<Environment> ◄────────┘ (each Shared holds an Arc)
//!
//!   open("de_AT") ─► resolve dir ─► live Shared for dir? ─► clone handle
//!                                         │ no
//!                                         ▼
//!                     live Environment? else create ─► TableStore::open
//! ```
//!
//! The registry only holds weak references: handles keep stores alive and
//! stores keep the environment alive.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::config::TmConfig;
use crate::env::Environment;
use crate::error::{Result, TmError};
use crate::lang::{discover_languages, resolve_language_dir, validate_language};
use crate::memory::{Shared, TranslationMemory};
use crate::migrate::{migrate_legacy_root, MigrationReport};
use crate::storage::TableStore;

#[derive(Default)]
struct Instances {
    stores: HashMap<PathBuf, Weak<Shared>>,
    env: Weak<Environment>,
}

impl Instances {
    fn live(&mut self) -> usize {
        self.stores.retain(|_, shared| shared.strong_count() > 0);
        self.stores.len()
    }
}

pub struct Registry {
    config: TmConfig,
    instances: Mutex<Instances>,
}

impl Registry {
    pub fn new(config: TmConfig) -> Self {
        Self {
            config,
            instances: Mutex::new(Instances::default()),
        }
    }

    pub fn config(&self) -> &TmConfig {
        &self.config
    }

    pub fn database_dir(&self) -> &Path {
        &self.config.database_dir
    }

    fn lock(&self) -> MutexGuard<'_, Instances> {
        self.instances.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a store for `language` (or a close variant) already exists.
    pub fn is_supported(&self, language: &str) -> bool {
        matches!(resolve_language_dir(self.database_dir(), language), Ok(Some(_)))
    }

    /// Open the translation memory for `language`.
    ///
    /// Falls back to a related language directory when one exists, and
    /// creates `<root>/<language>` otherwise. Opening a directory that is
    /// already open returns a handle to the same store.
    pub fn open(&self, language: &str) -> Result<TranslationMemory> {
        validate_language(language)?;
        let root = self.database_dir();
        let dir = resolve_language_dir(root, language)?.unwrap_or_else(|| root.join(language));

        std::fs::create_dir_all(&dir).map_err(|source| TmError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let mut instances = self.lock();
        instances.live();

        if let Some(shared) = instances.stores.get(&dir).and_then(Weak::upgrade) {
            log::debug!("Reusing TM store {} for '{language}'", dir.display());
            return Ok(TranslationMemory::new(shared, language, self.config.fuzzy));
        }

        let env = match instances.env.upgrade() {
            Some(env) => env,
            None => {
                let env = Arc::new(Environment::create(root, &self.config.store)?);
                instances.env = Arc::downgrade(&env);
                env
            }
        };

        let store = TableStore::open(&dir, &self.config.store, &env)?;
        let shared = Arc::new(Shared { store, env });
        instances.stores.insert(dir, Arc::downgrade(&shared));

        Ok(TranslationMemory::new(shared, language, self.config.fuzzy))
    }

    /// Number of stores currently open.
    pub fn open_count(&self) -> usize {
        self.lock().live()
    }

    /// Whether the shared environment is alive.
    pub fn environment_active(&self) -> bool {
        self.lock().env.strong_count() > 0
    }

    /// Language directories present under the database root.
    pub fn languages(&self) -> Result<Vec<String>> {
        discover_languages(self.database_dir())
    }

    /// Move stores from `old_root` into this registry's root.
    ///
    /// `languages` limits the move; `None` moves every language directory
    /// found. Refused while any store is open.
    pub fn migrate_legacy(
        &self,
        old_root: &Path,
        languages: Option<&[String]>,
    ) -> Result<MigrationReport> {
        let open = self.open_count();
        if open > 0 {
            return Err(TmError::InUse(open));
        }
        migrate_legacy_root(old_root, self.database_dir(), languages)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("database_dir", &self.config.database_dir)
            .field("open", &self.open_count())
            .finish()
    }
}
