//! Durable storage for license records.
//!
//! The engine talks to storage through two layers:
//! - [`LicenseStore`] — a plain keyed get/put/delete contract that any
//!   durable backend can implement ([`MemoryStore`] and [`SqliteStore`]
//!   ship here).
//! - [`TransactionalStore`] — wraps a `LicenseStore` and adds
//!   [`TransactionalStore::transact`], a read-modify-write critical
//!   section per license id. Calls for the same id serialize; calls for
//!   different ids proceed in parallel.
//!
//! Records are stored as JSON blobs so the backends stay schema-free and
//! interchangeable.

mod error;
mod memory;
mod sqlite;
mod store;
mod transact;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::LicenseStore;
pub use transact::{TransactionalStore, Transition, DEFAULT_OP_TIMEOUT};
