//! Admin capability check.
//!
//! The engine gates create and delete behind a single injected predicate
//! so the credential scheme can evolve without touching entitlement
//! logic.

/// Decides whether a caller-supplied credential grants admin capability.
pub trait AdminPolicy: Send + Sync {
    /// Returns true if the credential is acceptable.
    fn is_authorized(&self, credential: &str) -> bool;
}

/// Grants admin capability to callers presenting a shared key.
pub struct SharedKeyAdmin {
    key: String,
}

impl SharedKeyAdmin {
    /// Creates a policy accepting exactly the given key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl AdminPolicy for SharedKeyAdmin {
    fn is_authorized(&self, credential: &str) -> bool {
        // An empty configured key locks admin out entirely rather than
        // matching an empty credential.
        !self.key.is_empty() && credential == self.key
    }
}

/// Grants admin capability to everyone. For tests.
pub struct AllowAllAdmin;

impl AdminPolicy for AllowAllAdmin {
    fn is_authorized(&self, _credential: &str) -> bool {
        true
    }
}
