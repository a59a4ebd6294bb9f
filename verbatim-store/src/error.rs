//! Error type shared by every fallible translation-memory operation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TmError {
    #[error("Database error: {0}")]
    Database(#[from] rocksdb::Error),

    /// A stored record could not be decoded.
    #[error("Corrupt record in '{table}': {reason}")]
    Corrupt { table: &'static str, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The database was opened without one of its column families.
    #[error("Missing table: {0}")]
    MissingTable(&'static str),

    #[error("Invalid language tag: {0:?}")]
    InvalidLanguage(String),

    #[error("Cannot create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    /// Refused because translation memories are still open.
    #[error("Translation memory in use ({0} open)")]
    InUse(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TmError {
    pub(crate) fn corrupt(table: &'static str, reason: impl Into<String>) -> Self {
        TmError::Corrupt {
            table,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TmError>;
