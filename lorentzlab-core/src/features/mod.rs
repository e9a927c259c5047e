//! Feature construction and training data.
//!
//! A feature slot is a `(kind, param_a, param_b)` triple chosen at
//! configuration time. [`FeatureBuilder`] turns each bar into a normalized
//! [`FeatureVector`]; [`LabelGenerator`] attaches the causal 4-bar label; and
//! [`TrainingHistory`] keeps the resulting rows for the classifier.

pub mod builder;
pub mod calculator;
pub mod history;
pub mod label;

pub use builder::FeatureBuilder;
pub use calculator::FeatureCalculator;
pub use history::{TrainingHistory, TrainingRow};
pub use label::{Label, LabelGenerator, LABEL_LAG};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of feature slots.
pub const MAX_FEATURES: usize = 5;

/// Supported feature indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    #[serde(rename = "RSI")]
    Rsi,
    #[serde(rename = "WT")]
    WaveTrend,
    #[serde(rename = "CCI")]
    Cci,
    #[serde(rename = "ADX")]
    Adx,
}

impl FeatureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureKind::Rsi => "RSI",
            FeatureKind::WaveTrend => "WT",
            FeatureKind::Cci => "CCI",
            FeatureKind::Adx => "ADX",
        }
    }
}

/// One configured feature slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub kind: FeatureKind,
    pub param_a: usize,
    pub param_b: usize,
}

impl FeatureSpec {
    pub fn new(kind: FeatureKind, param_a: usize, param_b: usize) -> Self {
        Self {
            kind,
            param_a,
            param_b,
        }
    }
}

impl fmt::Display for FeatureSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{})", self.kind.as_str(), self.param_a, self.param_b)
    }
}

/// Normalized feature values for one bar. Only the first `len` slots are
/// meaningful; the rest stay zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; MAX_FEATURES],
    len: usize,
}

impl FeatureVector {
    pub fn from_slice(values: &[f64]) -> Self {
        debug_assert!(values.len() <= MAX_FEATURES);
        let len = values.len().min(MAX_FEATURES);
        let mut out = [0.0; MAX_FEATURES];
        out[..len].copy_from_slice(&values[..len]);
        Self { values: out, len }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, slot: usize) -> Option<f64> {
        self.as_slice().get(slot).copied()
    }
}
