use std::fmt;

use sha2::{Digest, Sha256};

/// A deterministic resource id derived from a seed value.
///
/// Renders as `<prefix>-<hex>` using the first 16 bytes of the SHA-256 of the
/// seed, so identifiers such as an MBI never appear verbatim in resource ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn derived(prefix: &str, seed: &str) -> Self {
        let digest = Sha256::digest(seed.as_bytes());
        Self(format!("{prefix}-{}", hex::encode(&digest[..16])))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
