//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A record with the same hash already exists.
    #[error("credential already exists for hash prefix {0}")]
    Conflict(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// A lock was poisoned by a panicking holder.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),

    /// The blocking worker running a database call failed.
    #[error("blocking task failed: {0}")]
    Join(String),
}

impl StoreError {
    pub(crate) fn conflict(hash: &str) -> Self {
        StoreError::Conflict(hash.chars().take(16).collect())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
