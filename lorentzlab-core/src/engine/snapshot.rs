//! Persisted training history.
//!
//! A snapshot carries the training rows plus the [`FeatureHash`] of the
//! feature set that produced them, so rows are never mixed across feature
//! definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::TrainingRow;
use crate::fingerprint::FeatureHash;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot feature set {found} does not match engine feature set {expected}")]
    FeatureHashMismatch {
        expected: FeatureHash,
        found: FeatureHash,
    },
    #[error("snapshot row for bar {bar_index} has {found} features, expected {expected}")]
    FeatureCount {
        bar_index: usize,
        expected: usize,
        found: usize,
    },
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub feature_hash: FeatureHash,
    pub feature_count: usize,
    /// Oldest first.
    pub rows: Vec<TrainingRow>,
}

impl HistorySnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Check every row against the expected width.
    pub fn check_rows(&self, expected: usize) -> Result<(), SnapshotError> {
        for row in &self.rows {
            if row.features.len() != expected {
                return Err(SnapshotError::FeatureCount {
                    bar_index: row.bar_index,
                    expected,
                    found: row.features.len(),
                });
            }
        }
        Ok(())
    }
}
