//! Error types for the entitlement engine.

use keygate_store::StoreError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine-level failures. Policy outcomes (expired, limit reached, ...)
/// are not errors; they live on the operation outcome types.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A request field is missing or malformed. Client error; never
    /// retried.
    #[error("missing or invalid {0}")]
    InvalidInput(&'static str),

    /// No record exists under the given license id.
    #[error("unknown license: {0}")]
    NotFound(String),

    /// The caller failed the admin capability check.
    #[error("caller is not authorized for admin operations")]
    Unauthorized,

    /// The storage layer failed or timed out. Transient; the whole
    /// operation is safe to retry because an aborted transaction persists
    /// nothing.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// License id generation kept colliding. Fatal to the one create
    /// request, not to the process.
    #[error("license keyspace exhausted after {0} attempts")]
    KeyspaceExhausted(u32),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}
