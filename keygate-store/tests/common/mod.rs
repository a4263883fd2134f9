//! Shared test helpers for store tests.

#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use keygate_types::{HardwareId, LicenseId, LicenseRecord};

/// Builds a record with the given id and slot limit, expiring far in the
/// future.
pub fn make_record(id: &str, max_activations: u32) -> LicenseRecord {
    LicenseRecord::new(
        LicenseId::new(id).unwrap(),
        "Test Customer",
        "Print Studio Pro",
        "1.0.0",
        NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        max_activations,
        Utc::now(),
    )
}

pub fn license_id(id: &str) -> LicenseId {
    LicenseId::new(id).unwrap()
}

pub fn hwid(s: &str) -> HardwareId {
    HardwareId::new(s).unwrap()
}
