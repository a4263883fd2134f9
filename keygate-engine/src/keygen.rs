//! License id generation.
//!
//! Produces professional-style grouped keys (e.g.
//! `DTF-9QK2-X8WR-2TLP-XYZ`): a fixed prefix and suffix around random
//! blocks drawn from uppercase letters and digits. With the default shape
//! (three blocks of four) the random keyspace is 36^12 — collisions are
//! astronomically unlikely, but the engine still commits each candidate
//! through a store transaction and regenerates on a hit, so uniqueness is
//! enforced structurally rather than assumed.

use keygate_types::LicenseId;
use rand::Rng;

const KEY_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Shape of generated license ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFormat {
    /// Literal first segment.
    pub prefix: String,
    /// Literal last segment.
    pub suffix: String,
    /// Number of random segments.
    pub blocks: usize,
    /// Characters per random segment.
    pub block_len: usize,
}

impl Default for KeyFormat {
    fn default() -> Self {
        Self {
            prefix: "DTF".to_string(),
            suffix: "XYZ".to_string(),
            blocks: 3,
            block_len: 4,
        }
    }
}

impl KeyFormat {
    /// Generates one candidate license id.
    #[must_use]
    pub fn generate(&self) -> LicenseId {
        let mut rng = rand::thread_rng();
        let mut parts: Vec<String> = Vec::with_capacity(self.blocks + 2);
        if !self.prefix.is_empty() {
            parts.push(self.prefix.clone());
        }
        for _ in 0..self.blocks {
            let block: String = (0..self.block_len)
                .map(|_| KEY_CHARSET[rng.gen_range(0..KEY_CHARSET.len())] as char)
                .collect();
            parts.push(block);
        }
        if !self.suffix.is_empty() {
            parts.push(self.suffix.clone());
        }
        LicenseId::from_canonical(parts.join("-"))
    }
}
