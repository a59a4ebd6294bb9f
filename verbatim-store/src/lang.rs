//! Mapping language tags to store directories.
//!
//! Resolution of tag `L` under the database root:
//!
//! 1. `<root>/L` if it is a directory;
//! 2. for a 5-character tag such as `de_AT`, `<root>/de`;
//! 3. for a 2-character tag such as `pt`, the first `pt_??` directory in
//!    sorted order.

use std::path::{Path, PathBuf};

use crate::env::RUNTIME_DIR;
use crate::error::{Result, TmError};

/// Reject tags that are not a single plain path component.
pub fn validate_language(language: &str) -> Result<()> {
    let invalid = language.is_empty()
        || language.starts_with('.')
        || language.contains(['/', '\\', '\0'])
        || language.chars().any(char::is_whitespace);
    if invalid {
        return Err(TmError::InvalidLanguage(language.to_owned()));
    }
    Ok(())
}

/// Existing directory holding the store for `language`, if any.
pub fn resolve_language_dir(root: &Path, language: &str) -> Result<Option<PathBuf>> {
    validate_language(language)?;
    if !root.is_dir() {
        return Ok(None);
    }

    let exact = root.join(language);
    if exact.is_dir() {
        return Ok(Some(exact));
    }

    let chars: Vec<char> = language.chars().collect();
    match chars.len() {
        5 => {
            let base: String = chars[..2].iter().collect();
            let dir = root.join(base);
            if dir.is_dir() {
                return Ok(Some(dir));
            }
        }
        2 => {
            let variants = discover_languages(root)?;
            let found = variants.into_iter().find(|name| is_variant_of(name, language));
            if let Some(name) = found {
                return Ok(Some(root.join(name)));
            }
        }
        _ => {}
    }

    Ok(None)
}

/// `xx_??`: the base tag, an underscore, and exactly two more characters.
fn is_variant_of(name: &str, base: &str) -> bool {
    name.strip_prefix(base)
        .and_then(|rest| rest.strip_prefix('_'))
        .is_some_and(|region| region.chars().count() == 2)
}

/// Whether content tagged `candidate` belongs in the memory for `language`.
///
/// Same fallbacks as directory resolution: `de_AT` accepts `de`, and `pt`
/// accepts any `pt_??`.
pub fn language_matches(candidate: &str, language: &str) -> bool {
    if candidate == language {
        return true;
    }
    match language.chars().count() {
        5 => language
            .char_indices()
            .nth(2)
            .is_some_and(|(i, c)| c == '_' && candidate == &language[..i]),
        2 => is_variant_of(candidate, language),
        _ => false,
    }
}

/// Language directories under `root`, sorted by name.
pub fn discover_languages(root: &Path) -> Result<Vec<String>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    let mut languages = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if name == RUNTIME_DIR || validate_language(&name).is_err() {
            continue;
        }
        languages.push(name);
    }
    languages.sort();
    Ok(languages)
}
