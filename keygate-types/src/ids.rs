//! Identifier types used throughout the Keygate core.
//!
//! License ids are human-transcribable grouped keys (e.g.
//! `DTF-9QK2-X8WR-2TLP-XYZ`), so they are normalized to uppercase on the
//! way in. Hardware ids are opaque client-generated strings and are kept
//! byte-for-byte as received.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a license record. The primary key of the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenseId(String);

impl LicenseId {
    /// Creates a license id from user input, trimming whitespace and
    /// normalizing to uppercase for transcription tolerance.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let normalized = s.as_ref().trim().to_uppercase();
        if normalized.is_empty() {
            return Err(Error::EmptyLicenseId);
        }
        Ok(Self(normalized))
    }

    /// Creates a license id from an already-canonical string.
    ///
    /// Used by the key generator, which only emits canonical form.
    #[must_use]
    pub fn from_canonical(s: String) -> Self {
        Self(s)
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LicenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LicenseId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Opaque identifier for one installation target (a hardware fingerprint
/// reported by the desktop client).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HardwareId(String);

impl HardwareId {
    /// Creates a hardware id, trimming surrounding whitespace.
    /// The content is otherwise opaque and preserved exactly.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyHardwareId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HardwareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HardwareId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
