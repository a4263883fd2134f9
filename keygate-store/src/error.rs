//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend failed or is unreachable. Callers may retry the whole
    /// operation; an aborted transaction leaves no partial write behind.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A storage call exceeded its time bound.
    #[error("store operation timed out")]
    Timeout,

    /// A stored record blob failed to (de)serialize.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
