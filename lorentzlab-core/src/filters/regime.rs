//! Regime filter - passes unless the trend-line slope has collapsed.
//!
//! Reads the normalized slope from [`RegimeSlope`](crate::indicators::RegimeSlope)
//! and passes when it is at or above the threshold.

use super::{BarFilter, FilterCheck};
use crate::config::RegimeFilterConfig;
use crate::indicators::IndicatorSnapshot;

#[derive(Debug, Clone)]
pub struct RegimeFilter {
    enabled: bool,
    threshold: f64,
}

impl RegimeFilter {
    pub fn new(config: &RegimeFilterConfig) -> Self {
        Self {
            enabled: config.enabled,
            threshold: config.threshold,
        }
    }
}

impl BarFilter for RegimeFilter {
    fn name(&self) -> &str {
        "regime"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn evaluate(&self, snapshot: &IndicatorSnapshot) -> FilterCheck {
        if !self.enabled {
            return FilterCheck::disabled(self.name());
        }
        match snapshot.regime_slope {
            Some(v) => FilterCheck::measured(self.name(), v, v >= self.threshold),
            None => FilterCheck::warming(self.name()),
        }
    }
}
