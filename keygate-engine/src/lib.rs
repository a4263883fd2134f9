//! License entitlement engine.
//!
//! This crate implements the entitlement state machine: how a license
//! record's activation-slot set evolves under concurrent, possibly
//! repeated, client calls. Every client operation (activate, verify,
//! deactivate) and admin operation (create, delete) runs as one atomic
//! read-modify-write transaction against the store, so no interleaving of
//! requests can oversubscribe slots or double-enroll a hardware id.
//!
//! # Design Principles
//!
//! - **One transaction per request**: read, apply policy, write or keep.
//!   Retrying a failed request is always safe.
//! - **Policy outcomes are data**: expired, limit-reached, already-active
//!   and friends are ordinary results, not errors.
//! - **Injected collaborators**: the store backend, the clock, and the
//!   admin capability check all arrive through seams, keeping expiry and
//!   authorization deterministically testable.

mod admin;
mod engine;
mod error;
mod keygen;
mod outcome;

pub use admin::{AdminPolicy, AllowAllAdmin, SharedKeyAdmin};
pub use engine::{CreateLicense, CreatedLicense, EngineConfig, LicenseEngine, VerifyPolicy};
pub use error::{EngineError, EngineResult};
pub use keygen::KeyFormat;
pub use outcome::{ActivateOutcome, DeactivateOutcome, LicenseSummary, VerifyOutcome};
