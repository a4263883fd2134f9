//! The license record — one entitlement document per license id.
//!
//! The activation-slot list is private and can only change through
//! [`LicenseRecord::claim_slot`] and [`LicenseRecord::release_slot`], so
//! the two structural invariants hold by construction:
//! - the list never exceeds `max_activations` entries
//! - no hardware id appears twice
//!
//! Insertion order is preserved (it matches what clients historically saw
//! in responses) but carries no meaning.

use crate::{HardwareId, LicenseId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Result of attempting to claim an activation slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotClaim {
    /// The hardware id was enrolled into a free slot.
    Claimed,
    /// The hardware id already held a slot; nothing changed.
    AlreadyHeld,
    /// All slots are taken by other hardware ids; nothing changed.
    LimitReached,
}

/// One license entitlement: who bought it, what it unlocks, until when,
/// and which hardware ids currently hold activation slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Primary key. Immutable once created.
    pub license_id: LicenseId,
    /// Customer display name.
    pub customer: String,
    /// Product display name.
    pub product: String,
    /// Product version string.
    pub version: String,
    /// Last calendar date the license is usable (inclusive).
    pub expiry: NaiveDate,
    /// Maximum number of simultaneously activated hardware ids.
    pub max_activations: u32,
    /// Hardware ids currently holding activation slots.
    activated_hwids: Vec<HardwareId>,
    /// Creation timestamp. Immutable.
    pub created_at: DateTime<Utc>,
}

impl LicenseRecord {
    /// Creates a fresh record with no activation slots taken.
    #[must_use]
    pub fn new(
        license_id: LicenseId,
        customer: impl Into<String>,
        product: impl Into<String>,
        version: impl Into<String>,
        expiry: NaiveDate,
        max_activations: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            license_id,
            customer: customer.into(),
            product: product.into(),
            version: version.into(),
            expiry,
            max_activations,
            activated_hwids: Vec::new(),
            created_at,
        }
    }

    /// Returns true if the license is past its expiry date.
    /// The license is still usable on the expiry date itself.
    #[must_use]
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry < today
    }

    /// Returns true if the hardware id currently holds a slot.
    #[must_use]
    pub fn holds(&self, hwid: &HardwareId) -> bool {
        self.activated_hwids.contains(hwid)
    }

    /// Returns the hardware ids currently holding slots.
    #[must_use]
    pub fn activated_hwids(&self) -> &[HardwareId] {
        &self.activated_hwids
    }

    /// Returns the number of slots in use.
    #[must_use]
    pub fn activations_used(&self) -> u32 {
        self.activated_hwids.len() as u32
    }

    /// Returns the number of free slots.
    #[must_use]
    pub fn remaining_activations(&self) -> u32 {
        self.max_activations.saturating_sub(self.activations_used())
    }

    /// Attempts to enroll the hardware id into an activation slot.
    ///
    /// Re-claiming an already-held slot is a no-op reported as
    /// [`SlotClaim::AlreadyHeld`]. Expiry is not checked here; the engine
    /// gates on it before claiming.
    pub fn claim_slot(&mut self, hwid: HardwareId) -> SlotClaim {
        if self.holds(&hwid) {
            return SlotClaim::AlreadyHeld;
        }
        if self.activations_used() >= self.max_activations {
            return SlotClaim::LimitReached;
        }
        self.activated_hwids.push(hwid);
        SlotClaim::Claimed
    }

    /// Releases the slot held by the hardware id.
    /// Returns false if it held none.
    pub fn release_slot(&mut self, hwid: &HardwareId) -> bool {
        let before = self.activated_hwids.len();
        self.activated_hwids.retain(|h| h != hwid);
        self.activated_hwids.len() < before
    }
}
