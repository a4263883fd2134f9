//! The entitlement engine.
//!
//! Each operation runs as a single [`TransactionalStore::transact`] call:
//! read the current record, apply policy, write back (or keep), return
//! the outcome. Two simultaneous activations for the same license can
//! therefore never both squeeze past the slot limit, and a repeated
//! activation can never double-enroll a hardware id.

use crate::admin::AdminPolicy;
use crate::error::{EngineError, EngineResult};
use crate::keygen::KeyFormat;
use crate::outcome::{ActivateOutcome, DeactivateOutcome, LicenseSummary, VerifyOutcome};
use chrono::NaiveDate;
use keygate_store::{TransactionalStore, Transition};
use keygate_types::{Clock, HardwareId, LicenseId, LicenseRecord, SlotClaim};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Whether verify may claim a slot for an unknown hardware id.
///
/// Auto-enrollment is the behavior the desktop client has always relied
/// on (verify doubles as activate-on-demand); it is spelled out as a
/// policy so deployments can turn it off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyPolicy {
    /// Verify enrolls an unregistered hardware id when a slot is free.
    #[default]
    AutoEnroll,
    /// Verify never mutates; an unregistered hardware id is reported as
    /// not enrolled.
    ReadOnly,
}

/// Engine-level configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Product name stamped on records created without one.
    pub default_product: String,
    /// Version string stamped on records created without one.
    pub default_version: String,
    /// Slot limit for records created without one.
    pub default_max_activations: u32,
    /// Verify mutation policy.
    pub verify_policy: VerifyPolicy,
    /// Shape of generated license ids.
    pub key_format: KeyFormat,
    /// Bound on id regeneration when creates keep colliding.
    pub max_keygen_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_product: "Print Studio Pro".to_string(),
            default_version: "1.0.0".to_string(),
            default_max_activations: 1,
            verify_policy: VerifyPolicy::default(),
            key_format: KeyFormat::default(),
            max_keygen_attempts: 16,
        }
    }
}

/// Admin request to create a license record.
#[derive(Debug, Clone)]
pub struct CreateLicense {
    pub customer: String,
    pub expiry: NaiveDate,
    /// Defaults to [`EngineConfig::default_max_activations`].
    pub max_activations: Option<u32>,
    /// Defaults to [`EngineConfig::default_product`].
    pub product: Option<String>,
    /// Defaults to [`EngineConfig::default_version`].
    pub version: Option<String>,
}

/// A freshly created license.
#[derive(Debug, Clone)]
pub struct CreatedLicense {
    pub license_id: LicenseId,
    pub record: LicenseRecord,
}

/// The entitlement engine — every operation is one atomic transaction
/// against the store.
pub struct LicenseEngine {
    store: Arc<TransactionalStore>,
    clock: Arc<dyn Clock>,
    admin: Arc<dyn AdminPolicy>,
    config: EngineConfig,
}

impl LicenseEngine {
    /// Creates an engine with the default configuration.
    pub fn new(
        store: Arc<TransactionalStore>,
        clock: Arc<dyn Clock>,
        admin: Arc<dyn AdminPolicy>,
    ) -> Self {
        Self::with_config(store, clock, admin, EngineConfig::default())
    }

    /// Creates an engine with a custom configuration.
    pub fn with_config(
        store: Arc<TransactionalStore>,
        clock: Arc<dyn Clock>,
        admin: Arc<dyn AdminPolicy>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            clock,
            admin,
            config,
        }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ── Client operations ────────────────────────────────────────

    /// Enrolls a hardware id into an activation slot.
    pub async fn activate(&self, license_id: &str, hwid: &str) -> EngineResult<ActivateOutcome> {
        let id = parse_license_id(license_id)?;
        let hw = parse_hwid(hwid)?;
        let today = self.clock.today();

        let not_found_id = id.to_string();
        let outcome = self
            .store
            .transact(&id, move |existing| {
                let Some(mut record) = existing else {
                    return (Transition::Keep, Err(EngineError::NotFound(not_found_id)));
                };
                if record.is_expired(today) {
                    return (Transition::Keep, Ok(ActivateOutcome::Expired));
                }
                match record.claim_slot(hw) {
                    SlotClaim::AlreadyHeld => (
                        Transition::Keep,
                        Ok(ActivateOutcome::AlreadyActive {
                            customer: record.customer.clone(),
                            expiry: record.expiry,
                        }),
                    ),
                    SlotClaim::LimitReached => (Transition::Keep, Ok(ActivateOutcome::LimitReached)),
                    SlotClaim::Claimed => {
                        let customer = record.customer.clone();
                        let expiry = record.expiry;
                        (
                            Transition::Put(record),
                            Ok(ActivateOutcome::Activated { customer, expiry }),
                        )
                    }
                }
            })
            .await??;

        match &outcome {
            ActivateOutcome::Activated { .. } => info!("activated hardware id on {}", id),
            ActivateOutcome::AlreadyActive { .. } => {
                debug!("hardware id already active on {}", id)
            }
            ActivateOutcome::LimitReached => warn!("activation limit reached on {}", id),
            ActivateOutcome::Expired => debug!("activation attempt on expired license {}", id),
        }
        Ok(outcome)
    }

    /// Checks a license for a hardware id, enrolling it on demand under
    /// [`VerifyPolicy::AutoEnroll`].
    pub async fn verify(&self, license_id: &str, hwid: &str) -> EngineResult<VerifyOutcome> {
        let id = parse_license_id(license_id)?;
        let hw = parse_hwid(hwid)?;
        let today = self.clock.today();
        let policy = self.config.verify_policy;

        let not_found_id = id.to_string();
        let outcome = self
            .store
            .transact(&id, move |existing| {
                let Some(mut record) = existing else {
                    return (Transition::Keep, Err(EngineError::NotFound(not_found_id)));
                };
                if record.is_expired(today) {
                    return (Transition::Keep, Ok(VerifyOutcome::Expired));
                }
                if record.holds(&hw) {
                    return (
                        Transition::Keep,
                        Ok(VerifyOutcome::Valid {
                            summary: LicenseSummary::of(&record),
                            newly_enrolled: false,
                        }),
                    );
                }
                match policy {
                    VerifyPolicy::ReadOnly => (Transition::Keep, Ok(VerifyOutcome::NotEnrolled)),
                    VerifyPolicy::AutoEnroll => match record.claim_slot(hw) {
                        SlotClaim::LimitReached => {
                            (Transition::Keep, Ok(VerifyOutcome::LimitReached))
                        }
                        _ => {
                            let summary = LicenseSummary::of(&record);
                            (
                                Transition::Put(record),
                                Ok(VerifyOutcome::Valid {
                                    summary,
                                    newly_enrolled: true,
                                }),
                            )
                        }
                    },
                }
            })
            .await??;

        match &outcome {
            VerifyOutcome::Valid { newly_enrolled: true, .. } => {
                info!("auto-enrolled hardware id during verify on {}", id)
            }
            VerifyOutcome::Valid { .. } => debug!("verified license {}", id),
            VerifyOutcome::NotEnrolled => debug!("hardware id not enrolled on {}", id),
            VerifyOutcome::LimitReached => warn!("activation limit reached on {}", id),
            VerifyOutcome::Expired => debug!("verify attempt on expired license {}", id),
        }
        Ok(outcome)
    }

    /// Releases the slot held by a hardware id.
    pub async fn deactivate(&self, license_id: &str, hwid: &str) -> EngineResult<DeactivateOutcome> {
        let id = parse_license_id(license_id)?;
        let hw = parse_hwid(hwid)?;

        let not_found_id = id.to_string();
        let outcome = self
            .store
            .transact(&id, move |existing| {
                let Some(mut record) = existing else {
                    return (Transition::Keep, Err(EngineError::NotFound(not_found_id)));
                };
                if record.release_slot(&hw) {
                    let remaining = record.remaining_activations();
                    (
                        Transition::Put(record),
                        Ok(DeactivateOutcome::Deactivated { remaining }),
                    )
                } else {
                    (Transition::Keep, Ok(DeactivateOutcome::NotActive))
                }
            })
            .await??;

        match &outcome {
            DeactivateOutcome::Deactivated { remaining } => {
                info!("deactivated hardware id on {} ({} slots free)", id, remaining)
            }
            DeactivateOutcome::NotActive => debug!("hardware id was not active on {}", id),
        }
        Ok(outcome)
    }

    // ── Admin operations ─────────────────────────────────────────

    /// Creates a license record under a freshly generated id.
    ///
    /// The candidate id is committed through the same per-key transaction
    /// the client operations use, so a collision can never overwrite an
    /// existing record; the engine regenerates instead, up to
    /// [`EngineConfig::max_keygen_attempts`] times.
    pub async fn create_license(
        &self,
        credential: &str,
        request: CreateLicense,
    ) -> EngineResult<CreatedLicense> {
        self.authorize(credential)?;

        let customer = request.customer.trim().to_string();
        if customer.is_empty() {
            return Err(EngineError::InvalidInput("customer"));
        }
        let max_activations = request
            .max_activations
            .unwrap_or(self.config.default_max_activations);
        if max_activations == 0 {
            return Err(EngineError::InvalidInput("max_activations"));
        }
        let product = request
            .product
            .unwrap_or_else(|| self.config.default_product.clone());
        let version = request
            .version
            .unwrap_or_else(|| self.config.default_version.clone());

        for attempt in 1..=self.config.max_keygen_attempts {
            let id = self.config.key_format.generate();
            let record = LicenseRecord::new(
                id.clone(),
                customer.clone(),
                product.clone(),
                version.clone(),
                request.expiry,
                max_activations,
                self.clock.now(),
            );

            let stored = record.clone();
            let committed = self
                .store
                .transact(&id, move |existing| match existing {
                    Some(_) => (Transition::Keep, false),
                    None => (Transition::Put(stored), true),
                })
                .await?;

            if committed {
                info!("created license {} for {}", id, record.customer);
                return Ok(CreatedLicense {
                    license_id: id,
                    record,
                });
            }
            warn!("generated license id {} collided (attempt {}); retrying", id, attempt);
        }

        Err(EngineError::KeyspaceExhausted(self.config.max_keygen_attempts))
    }

    /// Deletes a license record. Unconditional and irreversible.
    pub async fn delete_license(&self, credential: &str, license_id: &str) -> EngineResult<()> {
        self.authorize(credential)?;
        let id = parse_license_id(license_id)?;

        let existed = self
            .store
            .transact(&id, |existing| match existing {
                Some(_) => (Transition::Delete, true),
                None => (Transition::Keep, false),
            })
            .await?;

        if existed {
            info!("deleted license {}", id);
            Ok(())
        } else {
            Err(EngineError::NotFound(id.to_string()))
        }
    }

    fn authorize(&self, credential: &str) -> EngineResult<()> {
        if self.admin.is_authorized(credential) {
            Ok(())
        } else {
            warn!("rejected unauthorized admin call");
            Err(EngineError::Unauthorized)
        }
    }
}

fn parse_license_id(raw: &str) -> EngineResult<LicenseId> {
    LicenseId::new(raw).map_err(|_| EngineError::InvalidInput("license_key"))
}

fn parse_hwid(raw: &str) -> EngineResult<HardwareId> {
    HardwareId::new(raw).map_err(|_| EngineError::InvalidInput("hwid"))
}
