//! Shared test helpers for engine tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use keygate_engine::{AllowAllAdmin, CreateLicense, LicenseEngine};
use keygate_store::{MemoryStore, TransactionalStore};
use keygate_types::FixedClock;
use std::sync::Arc;

/// The pinned "today" every test engine sees.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Engine over a fresh in-memory store, pinned to [`today`], admin open.
pub fn engine() -> LicenseEngine {
    engine_parts().0
}

/// Same as [`engine`], also handing back the store for direct inspection.
pub fn engine_parts() -> (LicenseEngine, Arc<TransactionalStore>) {
    let store = Arc::new(TransactionalStore::new(Arc::new(MemoryStore::new())));
    let engine = LicenseEngine::new(
        store.clone(),
        Arc::new(FixedClock::on(today())),
        Arc::new(AllowAllAdmin),
    );
    (engine, store)
}

/// A create request expiring on the given date.
pub fn create_request(max_activations: u32, expiry: NaiveDate) -> CreateLicense {
    CreateLicense {
        customer: "Acme Corp".to_string(),
        expiry,
        max_activations: Some(max_activations),
        product: None,
        version: None,
    }
}

/// Creates a license through the engine, returning its id string.
pub async fn seeded_license(
    engine: &LicenseEngine,
    max_activations: u32,
    expiry: NaiveDate,
) -> String {
    engine
        .create_license("any", create_request(max_activations, expiry))
        .await
        .unwrap()
        .license_id
        .to_string()
}
