//! Error types for serato-sync-core

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for serato-sync operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(PathBuf),

    #[error("Truncated TLV stream: {context}")]
    Truncated { context: String },

    #[error("Malformed UTF-16 string: {0}")]
    MalformedString(String),

    #[error("Backup failed: {0}")]
    BackupFailed(String),
}

/// Result type alias for serato-sync operations
pub type Result<T> = std::result::Result<T, Error>;
