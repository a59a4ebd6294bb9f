//! Moving language stores out of an old database root.
//!
//! Each language directory is renamed into the new root. When that fails
//! (typically across filesystems) its files are moved one by one, copying
//! and removing where renaming is impossible. The old root is removed only
//! if every requested language moved and nothing else is left in it; it is
//! never removed recursively.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Result, TmError};
use crate::lang::{discover_languages, validate_language};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Languages now living under the new root.
    pub moved: Vec<String>,
    /// Languages that were requested but could not be moved.
    pub failed: Vec<String>,
    pub removed_old_root: bool,
}

impl MigrationReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub fn migrate_legacy_root(
    old_root: &Path,
    new_root: &Path,
    languages: Option<&[String]>,
) -> Result<MigrationReport> {
    let mut report = MigrationReport::default();

    if old_root == new_root || !old_root.is_dir() {
        return Ok(report);
    }

    let languages = match languages {
        Some(list) => list.to_vec(),
        None => discover_languages(old_root)?,
    };

    log::info!(
        "Moving TM from {} to {}: {}",
        old_root.display(),
        new_root.display(),
        languages.join(":")
    );

    for language in languages {
        match move_language(old_root, new_root, &language) {
            Ok(()) => report.moved.push(language),
            Err(e) => {
                log::warn!("Cannot move TM for '{language}': {e}");
                report.failed.push(language);
            }
        }
    }

    if report.is_complete() {
        report.removed_old_root = fs::remove_dir(old_root).is_ok();
    }
    if !report.removed_old_root {
        log::warn!(
            "Old TM location {} was kept; verify that everything was moved to {}",
            old_root.display(),
            new_root.display()
        );
    }

    Ok(report)
}

fn move_language(old_root: &Path, new_root: &Path, language: &str) -> Result<()> {
    validate_language(language)?;
    let from = old_root.join(language);
    let to = new_root.join(language);

    if !from.is_dir() {
        return Err(io::Error::new(io::ErrorKind::NotFound, "no such language directory").into());
    }
    if to.exists() && fs::read_dir(&to)?.next().is_some() {
        return Err(io::Error::new(io::ErrorKind::AlreadyExists, "target is not empty").into());
    }

    fs::create_dir_all(new_root).map_err(|source| TmError::CreateDir {
        path: new_root.to_path_buf(),
        source,
    })?;

    if fs::rename(&from, &to).is_ok() {
        return Ok(());
    }
    move_dir_contents(&from, &to)?;
    Ok(())
}

/// Move every file below `from` into `to`, then remove the emptied `from`.
fn move_dir_contents(from: &Path, to: &Path) -> io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            move_dir_contents(&entry.path(), &target)?;
        } else {
            move_file(&entry.path(), &target)?;
        }
    }
    fs::remove_dir(from)
}

fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)
}
