//! The storage contract the engine is written against.

use crate::error::StoreResult;
use async_trait::async_trait;
use keygate_types::{LicenseId, LicenseRecord};

/// A durable `license_id -> LicenseRecord` mapping.
///
/// Implementations must never return a torn record: a `get` observes
/// either a complete prior `put` or nothing. Write durability holds by the
/// time the call returns. Per-key atomicity across a read-modify-write
/// sequence is not this trait's job; [`crate::TransactionalStore`]
/// provides it on top.
#[async_trait]
pub trait LicenseStore: Send + Sync {
    /// Looks up a record by license id.
    async fn get(&self, id: &LicenseId) -> StoreResult<Option<LicenseRecord>>;

    /// Stores the record, replacing any previous version under the same id.
    async fn put(&self, record: &LicenseRecord) -> StoreResult<()>;

    /// Removes the record. Returns whether one existed.
    async fn delete(&self, id: &LicenseId) -> StoreResult<bool>;
}
