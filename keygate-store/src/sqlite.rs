//! SQLite store backend.
//!
//! Records are kept as JSON blobs in a single `licenses` table so the
//! schema never needs migrating when the record shape grows a field.
//! rusqlite is synchronous; calls run on the blocking thread pool.

use crate::error::{StoreError, StoreResult};
use crate::store::LicenseStore;
use async_trait::async_trait;
use keygate_types::{LicenseId, LicenseRecord};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// A `LicenseStore` backed by a SQLite database file.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError::Unavailable(format!("failed to open license store: {e}")))?;
        Self::from_connection(conn)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            StoreError::Unavailable(format!("failed to open in-memory license store: {e}"))
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS licenses (
                license_id TEXT PRIMARY KEY,
                record TEXT NOT NULL
            );
            ",
        )
        .map_err(|e| StoreError::Unavailable(format!("failed to init license schema: {e}")))?;
        Ok(())
    }

    async fn run_blocking<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap();
            op(&conn)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("storage task failed: {e}")))?
    }
}

#[async_trait]
impl LicenseStore for SqliteStore {
    async fn get(&self, id: &LicenseId) -> StoreResult<Option<LicenseRecord>> {
        let id = id.clone();
        self.run_blocking(move |conn| {
            let blob: Option<String> = conn
                .query_row(
                    "SELECT record FROM licenses WHERE license_id = ?1",
                    params![id.as_str()],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| StoreError::Unavailable(format!("failed to read license: {e}")))?;

            match blob {
                Some(json) => Ok(Some(serde_json::from_str(&json)?)),
                None => Ok(None),
            }
        })
        .await
    }

    async fn put(&self, record: &LicenseRecord) -> StoreResult<()> {
        let id = record.license_id.clone();
        let json = serde_json::to_string(record)?;
        self.run_blocking(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO licenses (license_id, record) VALUES (?1, ?2)",
                params![id.as_str(), json],
            )
            .map_err(|e| StoreError::Unavailable(format!("failed to write license: {e}")))?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &LicenseId) -> StoreResult<bool> {
        let id = id.clone();
        self.run_blocking(move |conn| {
            let removed = conn
                .execute(
                    "DELETE FROM licenses WHERE license_id = ?1",
                    params![id.as_str()],
                )
                .map_err(|e| StoreError::Unavailable(format!("failed to delete license: {e}")))?;
            Ok(removed > 0)
        })
        .await
    }
}
