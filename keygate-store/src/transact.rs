//! Per-license-id atomic read-modify-write on top of any `LicenseStore`.
//!
//! Two concurrent `transact` calls for the same license id never
//! interleave their read and write; calls for different ids do not block
//! each other. The lock table holds one async mutex per id currently in
//! use and drops entries once the last holder releases them, so it stays
//! proportional to in-flight work, not to the number of licenses.

use crate::error::{StoreError, StoreResult};
use crate::store::LicenseStore;
use keygate_types::{LicenseId, LicenseRecord};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Time bound on each call into the underlying store.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

/// What a transaction closure wants done with the record it was handed.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Leave the stored state untouched.
    Keep,
    /// Replace (or create) the record.
    Put(LicenseRecord),
    /// Remove the record.
    Delete,
}

/// Wraps a [`LicenseStore`] with per-key critical sections and bounded
/// I/O. The engine performs every operation through this type.
pub struct TransactionalStore {
    inner: Arc<dyn LicenseStore>,
    locks: Mutex<HashMap<LicenseId, Arc<Mutex<()>>>>,
    op_timeout: Duration,
}

impl TransactionalStore {
    /// Wraps a store with the default I/O time bound.
    #[must_use]
    pub fn new(inner: Arc<dyn LicenseStore>) -> Self {
        Self::with_timeout(inner, DEFAULT_OP_TIMEOUT)
    }

    /// Wraps a store with a custom I/O time bound.
    #[must_use]
    pub fn with_timeout(inner: Arc<dyn LicenseStore>, op_timeout: Duration) -> Self {
        Self {
            inner,
            locks: Mutex::new(HashMap::new()),
            op_timeout,
        }
    }

    /// Reads a record outside any critical section.
    ///
    /// Suitable for pure lookups (e.g. collision probes); anything that
    /// writes based on what it read belongs in [`Self::transact`].
    pub async fn get(&self, id: &LicenseId) -> StoreResult<Option<LicenseRecord>> {
        self.bounded(self.inner.get(id)).await
    }

    /// Applies a read-modify-write closure to one record under that
    /// record's critical section.
    ///
    /// The closure receives the current record (or `None`) and returns the
    /// desired [`Transition`] plus a caller-defined outcome, which is
    /// passed through once the write has been persisted. If the write
    /// fails, the outcome is discarded and the error surfaces instead, so
    /// no caller ever acts on a state that was not stored.
    pub async fn transact<T, F>(&self, id: &LicenseId, apply: F) -> StoreResult<T>
    where
        T: Send,
        F: FnOnce(Option<LicenseRecord>) -> (Transition, T) + Send,
    {
        let lock = self.key_lock(id).await;
        let guard = lock.lock().await;
        let result = self.run_transaction(id, apply).await;
        drop(guard);
        self.release_key_lock(id, &lock).await;
        result
    }

    async fn run_transaction<T, F>(&self, id: &LicenseId, apply: F) -> StoreResult<T>
    where
        T: Send,
        F: FnOnce(Option<LicenseRecord>) -> (Transition, T) + Send,
    {
        let existing = self.bounded(self.inner.get(id)).await?;
        let (transition, outcome) = apply(existing);
        match transition {
            Transition::Keep => {}
            Transition::Put(record) => {
                debug!("transact: writing record for {}", id);
                self.bounded(self.inner.put(&record)).await?;
            }
            Transition::Delete => {
                debug!("transact: deleting record for {}", id);
                self.bounded(self.inner.delete(id)).await?;
            }
        }
        Ok(outcome)
    }

    async fn bounded<T>(&self, op: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
        match tokio::time::timeout(self.op_timeout, op).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout),
        }
    }

    async fn key_lock(&self, id: &LicenseId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(id.clone()).or_default().clone()
    }

    async fn release_key_lock(&self, id: &LicenseId, held: &Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().await;
        if let Some(entry) = locks.get(id) {
            // Two references mean the table and ourselves; nobody else is
            // holding or waiting on this key, so the entry can go.
            if Arc::ptr_eq(entry, held) && Arc::strong_count(entry) == 2 {
                locks.remove(id);
            }
        }
    }

    #[cfg(test)]
    pub(crate) async fn lock_table_len(&self) -> usize {
        self.locks.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use keygate_types::LicenseId;

    fn make_record(id: &LicenseId) -> LicenseRecord {
        LicenseRecord::new(
            id.clone(),
            "Customer",
            "Product",
            "1.0.0",
            chrono::NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            1,
            chrono::Utc::now(),
        )
    }

    #[tokio::test]
    async fn lock_table_entries_are_reclaimed() {
        let store = TransactionalStore::new(Arc::new(MemoryStore::new()));
        let id = LicenseId::new("DTF-LOCK-LOCK-LOCK-XYZ").unwrap();
        let record = make_record(&id);

        store
            .transact(&id, move |_| (Transition::Put(record), ()))
            .await
            .unwrap();

        assert_eq!(store.lock_table_len().await, 0);
    }
}
