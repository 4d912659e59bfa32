use std::path::PathBuf;

use thiserror::Error;

/// Failure in the persistent item store.
///
/// Always recoverable from the caller's perspective: the sync coordinator
/// degrades to remote-only loading and the search engine degrades to an
/// in-memory scan. This error never reaches the UI layer directly.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to open menu database at {path}: {source}")]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },

    #[error("failed to create database directory for {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("menu store used before init()")]
    NotInitialized,

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
