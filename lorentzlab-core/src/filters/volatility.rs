//! Volatility filter - passes when recent range expands.
//!
//! Passes when ATR(short) > ratio * ATR(long). A zero long-window range has
//! nothing to compare against and counts as warming.

use super::{BarFilter, FilterCheck};
use crate::config::VolatilityFilterConfig;
use crate::indicators::IndicatorSnapshot;

#[derive(Debug, Clone)]
pub struct VolatilityFilter {
    enabled: bool,
    ratio: f64,
}

impl VolatilityFilter {
    pub fn new(config: &VolatilityFilterConfig) -> Self {
        Self {
            enabled: config.enabled,
            ratio: config.ratio,
        }
    }
}

impl BarFilter for VolatilityFilter {
    fn name(&self) -> &str {
        "volatility"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn evaluate(&self, snapshot: &IndicatorSnapshot) -> FilterCheck {
        if !self.enabled {
            return FilterCheck::disabled(self.name());
        }
        match (snapshot.atr_short, snapshot.atr_long) {
            (Some(short), Some(long)) if long > 0.0 => {
                FilterCheck::measured(self.name(), short, short > self.ratio * long)
            }
            _ => FilterCheck::warming(self.name()),
        }
    }
}
