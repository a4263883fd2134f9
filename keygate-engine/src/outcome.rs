//! Operation outcomes.
//!
//! These are the structured results of the three client operations. The
//! HTTP layer maps them to status codes and response envelopes; nothing
//! here knows about wire formats.

use keygate_types::{HardwareId, LicenseRecord};
use chrono::NaiveDate;
use serde::Serialize;

/// Result of an activate call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ActivateOutcome {
    /// The hardware id was enrolled into a free slot.
    Activated { customer: String, expiry: NaiveDate },
    /// The hardware id already held a slot. Same payload as a fresh
    /// activation so client retries are indistinguishable from success.
    AlreadyActive { customer: String, expiry: NaiveDate },
    /// All slots are taken by other hardware ids.
    LimitReached,
    /// The license is past its expiry date.
    Expired,
}

/// Everything a verify response reports about a license.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicenseSummary {
    pub customer: String,
    pub product: String,
    pub version: String,
    pub expiry: NaiveDate,
    pub activated_hwids: Vec<HardwareId>,
    pub max_activations: u32,
    pub activations_used: u32,
}

impl LicenseSummary {
    /// Snapshots the reportable state of a record.
    #[must_use]
    pub fn of(record: &LicenseRecord) -> Self {
        Self {
            customer: record.customer.clone(),
            product: record.product.clone(),
            version: record.version.clone(),
            expiry: record.expiry,
            activated_hwids: record.activated_hwids().to_vec(),
            max_activations: record.max_activations,
            activations_used: record.activations_used(),
        }
    }
}

/// Result of a verify call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum VerifyOutcome {
    /// The license is usable on this hardware id. `newly_enrolled` is true
    /// when this very call claimed the slot (auto-enrollment policy).
    Valid {
        summary: LicenseSummary,
        newly_enrolled: bool,
    },
    /// Read-only policy only: the hardware id holds no slot and the call
    /// did not claim one.
    NotEnrolled,
    /// All slots are taken by other hardware ids.
    LimitReached,
    /// The license is past its expiry date.
    Expired,
}

/// Result of a deactivate call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DeactivateOutcome {
    /// The slot was released. `remaining` counts free slots afterwards.
    Deactivated { remaining: u32 },
    /// The hardware id held no slot under this license. Nothing changed.
    NotActive,
}
