//! Translation-memory configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use verbatim_core::{FuzzyParams, MAX_FUZZINESS};

use crate::error::{Result, TmError};
use crate::storage::StoreConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TmConfig {
    /// Root holding one directory per language.
    pub database_dir: PathBuf,
    /// Default fuzziness of handles opened from the registry.
    pub fuzzy: FuzzyParams,
    pub store: StoreConfig,
}

impl Default for TmConfig {
    fn default() -> Self {
        Self {
            database_dir: default_database_dir(),
            fuzzy: FuzzyParams::default(),
            store: StoreConfig::default(),
        }
    }
}

impl TmConfig {
    pub fn for_testing(database_dir: impl Into<PathBuf>) -> Self {
        Self {
            database_dir: database_dir.into(),
            fuzzy: FuzzyParams::default(),
            store: StoreConfig::for_testing(),
        }
    }

    /// Reject settings the engine cannot honour.
    pub fn validate(&self) -> Result<()> {
        if !self.fuzzy.is_valid() {
            return Err(TmError::Config(format!(
                "fuzzy.max_omits and fuzzy.max_delta must be at most {MAX_FUZZINESS} (got {} and {})",
                self.fuzzy.max_omits, self.fuzzy.max_delta
            )));
        }
        Ok(())
    }
}

/// `$XDG_DATA_HOME/verbatim/TM`, or `~/.local/share/verbatim/TM`.
pub fn default_database_dir() -> PathBuf {
    data_home(
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
    .join("verbatim")
    .join("TM")
}

fn data_home(xdg_data_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    match (xdg_data_home, home) {
        (Some(xdg), _) if xdg.is_absolute() => xdg,
        (_, Some(home)) => home.join(".local").join("share"),
        _ => Path::new(".").to_path_buf(),
    }
}
