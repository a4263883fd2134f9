//! In-memory store backend, for tests and ephemeral deployments.

use crate::error::StoreResult;
use crate::store::LicenseStore;
use async_trait::async_trait;
use keygate_types::{LicenseId, LicenseRecord};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A `LicenseStore` backed by a process-local map. Nothing survives a
/// restart.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<LicenseId, LicenseRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if no records are stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl LicenseStore for MemoryStore {
    async fn get(&self, id: &LicenseId) -> StoreResult<Option<LicenseRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn put(&self, record: &LicenseRecord) -> StoreResult<()> {
        self.records
            .write()
            .await
            .insert(record.license_id.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, id: &LicenseId) -> StoreResult<bool> {
        Ok(self.records.write().await.remove(id).is_some())
    }
}
