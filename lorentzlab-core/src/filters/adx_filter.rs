//! ADX filter - gates signals by trend strength.
//!
//! Passes when ADX > threshold. Disabled by default.

use super::{BarFilter, FilterCheck};
use crate::config::AdxFilterConfig;
use crate::indicators::IndicatorSnapshot;

#[derive(Debug, Clone)]
pub struct AdxFilter {
    enabled: bool,
    threshold: f64,
}

impl AdxFilter {
    pub fn new(config: &AdxFilterConfig) -> Self {
        Self {
            enabled: config.enabled,
            threshold: config.threshold,
        }
    }
}

impl BarFilter for AdxFilter {
    fn name(&self) -> &str {
        "adx"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn evaluate(&self, snapshot: &IndicatorSnapshot) -> FilterCheck {
        if !self.enabled {
            return FilterCheck::disabled(self.name());
        }
        match snapshot.adx {
            Some(adx) => FilterCheck::measured(self.name(), adx, adx > self.threshold),
            None => FilterCheck::warming(self.name()),
        }
    }
}
