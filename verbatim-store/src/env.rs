//! Runtime environment shared by every store of one database root.
//!
//! ```text
//!   <root>/.runtime/          exists while anything is open
//!   <root>/.runtime/<pid>-<n>/  engine info logs of one environment
//!   <root>/de/                one RocksDB per language
//!   <root>/fr/
//! ```
//!
//! All stores opened through one [`Registry`](crate::Registry) share the
//! RocksDB `Env` and one LRU block cache. The environment lives as long as
//! any store does. Dropping it removes its own subdirectory, then
//! `.runtime` itself if no other environment still uses it.

use rocksdb::{Cache, Env};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Result, TmError};
use crate::storage::StoreConfig;

/// Name of the runtime directory inside the database root.
pub const RUNTIME_DIR: &str = ".runtime";

static NEXT_ENVIRONMENT: AtomicU64 = AtomicU64::new(0);

pub struct Environment {
    env: Env,
    cache: Cache,
    runtime_dir: PathBuf,
}

impl Environment {
    /// Create a fresh runtime directory under `<root>/.runtime` and the
    /// shared engine state.
    pub fn create(root: &Path, config: &StoreConfig) -> Result<Self> {
        let instance = NEXT_ENVIRONMENT.fetch_add(1, Ordering::Relaxed);
        let runtime_dir = root
            .join(RUNTIME_DIR)
            .join(format!("{}-{instance}", std::process::id()));
        // An older environment may remove `.runtime` between the two mkdirs.
        std::fs::create_dir_all(&runtime_dir)
            .or_else(|_| std::fs::create_dir_all(&runtime_dir))
            .map_err(|source| TmError::CreateDir {
                path: runtime_dir.clone(),
                source,
            })?;

        let env = Env::new()?;
        let cache = Cache::new_lru_cache(config.block_cache_size);

        log::info!(
            "TM environment created at {} ({} MiB block cache)",
            runtime_dir.display(),
            config.block_cache_size / (1024 * 1024)
        );

        Ok(Self {
            env,
            cache,
            runtime_dir,
        })
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Directory receiving the engines' info logs.
    pub fn runtime_dir(&self) -> &Path {
        &self.runtime_dir
    }
}

impl Drop for Environment {
    fn drop(&mut self) {
        match std::fs::remove_dir_all(&self.runtime_dir) {
            Ok(()) => log::info!("TM environment at {} torn down", self.runtime_dir.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!(
                "Failed to remove TM runtime directory {}: {e}",
                self.runtime_dir.display()
            ),
        }
        // Fails while another environment still has its directory there.
        if let Some(parent) = self.runtime_dir.parent() {
            let _ = std::fs::remove_dir(parent);
        }
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("runtime_dir", &self.runtime_dir)
            .finish_non_exhaustive()
    }
}
