//! Core type definitions for Keygate.
//!
//! This crate defines the fundamental types shared by the entitlement
//! engine and its storage layer:
//! - License and hardware identifiers
//! - The `LicenseRecord` entitlement document and its slot invariants
//! - The injectable `Clock` used for expiry decisions
//!
//! Transport shapes (request/response JSON) belong to the server crate,
//! not here.

mod clock;
mod ids;
mod record;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ids::{HardwareId, LicenseId};
pub use record::{LicenseRecord, SlotClaim};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("license id must not be empty")]
    EmptyLicenseId,

    #[error("hardware id must not be empty")]
    EmptyHardwareId,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
