//! Feature-set fingerprinting.
//!
//! A `FeatureHash` identifies the shape of the training data an engine
//! produces: the active feature slots (kind and both periods, in slot order)
//! plus the training window. Two engines with equal hashes can exchange
//! history snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::features::FeatureSpec;

/// BLAKE3 hex digest of the canonical feature-set description.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureHash(pub String);

impl FeatureHash {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes).to_hex().to_string())
    }

    /// Hash of the active feature slots and `max_bars_back`.
    pub fn of(features: &[FeatureSpec], max_bars_back: usize) -> Self {
        use serde_json::json;

        // json! objects serialize with sorted keys.
        let canonical = json!({
            "features": features,
            "max_bars_back": max_bars_back,
        });
        Self::from_bytes(canonical.to_string().as_bytes())
    }
}

impl fmt::Display for FeatureHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
