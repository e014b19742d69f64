//! # Store Errors
//!
//! Public error surface of the engine. Log-layer failures and raw I/O
//! errors convert via `From`; everything else is a store-level condition.

use thiserror::Error;

use crate::log::LogError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by the engine API
#[derive(Debug, Error)]
pub enum StoreError {
    /// Key absent, deleted, or expired
    #[error("Key not found")]
    NotFound,

    /// Key rejected before touching the logs
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Storage-layer failure
    #[error(transparent)]
    Log(#[from] LogError),

    /// Raw I/O failure outside the log layer
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The state lock was poisoned by a panicking thread
    #[error("Store state lock poisoned")]
    LockPoisoned,

    /// The writer was lost after a compaction swap; reopen the store
    #[error("Store halted: log writer could not be reopened after compaction")]
    Halted,
}

impl StoreError {
    /// True for conditions a caller can act on without operator help
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StoreError::NotFound | StoreError::InvalidKey(_))
    }
}
