//! Config file and catalog file loading.

use std::path::{Path, PathBuf};

use serde::Serialize;
use verbatim_store::{Catalog, TmConfig, TmError};

/// Parse a TOML config; missing keys keep their defaults.
pub fn parse_config(text: &str) -> Result<TmConfig, TmError> {
    let config: TmConfig = toml::from_str(text).map_err(|e| TmError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Defaults, overlaid with `path` if given, then with `--db`.
pub fn load_config(path: Option<&Path>, db: Option<PathBuf>) -> anyhow::Result<TmConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                anyhow::anyhow!("Failed to read config file '{}': {e}", path.display())
            })?;
            parse_config(&text)?
        }
        None => TmConfig::default(),
    };
    if let Some(db) = db {
        config.database_dir = db;
    }
    Ok(config)
}

/// Read a JSON catalog, naming it after the file when it has no name.
pub fn read_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read catalog '{}': {e}", path.display()))?;
    let mut catalog: Catalog = serde_json::from_str(&text)
        .map_err(|e| anyhow::anyhow!("Invalid catalog '{}': {e}", path.display()))?;
    if catalog.name.is_empty() {
        catalog.name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    Ok(catalog)
}

/// Pretty JSON to `path`, or to stdout.
pub fn write_json<T: Serialize>(path: Option<&Path>, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => std::fs::write(path, json + "\n")?,
        None => println!("{json}"),
    }
    Ok(())
}
