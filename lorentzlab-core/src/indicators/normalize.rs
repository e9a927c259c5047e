//! Range mapping for feature values.

use serde::{Deserialize, Serialize};

const MIN_RANGE: f64 = 1e-10;

/// Linearly map `value` from `[old_min, old_max]` onto `[new_min, new_max]`.
pub fn rescale(value: f64, old_min: f64, old_max: f64, new_min: f64, new_max: f64) -> f64 {
    new_min + (new_max - new_min) * (value - old_min) / (old_max - old_min).max(MIN_RANGE)
}

/// Min/max normalizer over every value seen so far.
///
/// Used for unbounded oscillators (WaveTrend, CCI). The observed range only
/// ever widens, so the output always lies in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunningNormalizer {
    min: f64,
    max: f64,
}

impl Default for RunningNormalizer {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl RunningNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, value: f64) -> f64 {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        (value - self.min) / (self.max - self.min).max(MIN_RANGE)
    }

    pub fn range(&self) -> Option<(f64, f64)> {
        (self.min <= self.max).then_some((self.min, self.max))
    }
}
