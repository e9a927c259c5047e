//! Bar filters: boolean gates on whether a prediction may become a signal.
//!
//! Filters read the current [`IndicatorSnapshot`] and carry no state of their
//! own. A disabled filter always passes. An enabled filter whose indicator is
//! still warming up reports `ready = false` and passes.

pub mod adx_filter;
pub mod regime;
pub mod volatility;

pub use adx_filter::AdxFilter;
pub use regime::RegimeFilter;
pub use volatility::VolatilityFilter;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::FilterConfig;
use crate::indicators::IndicatorSnapshot;

/// Trait for bar filters.
///
/// # Architecture invariant
/// Filters evaluate market conditions only; they never see signal or trade
/// state.
pub trait BarFilter: Send + Sync {
    /// Key in `BarResult::filter_states` (e.g., "volatility").
    fn name(&self) -> &str;

    fn enabled(&self) -> bool;

    fn evaluate(&self, snapshot: &IndicatorSnapshot) -> FilterCheck;
}

/// One filter's verdict on one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCheck {
    pub name: String,
    pub enabled: bool,
    /// False while the filter's indicator is warming up.
    pub ready: bool,
    pub passed: bool,
    /// The measured value, when there is one.
    pub value: Option<f64>,
}

impl FilterCheck {
    pub fn disabled(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: false,
            ready: true,
            passed: true,
            value: None,
        }
    }

    pub fn warming(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
            ready: false,
            passed: true,
            value: None,
        }
    }

    pub fn measured(name: &str, value: f64, passed: bool) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
            ready: true,
            passed,
            value: Some(value),
        }
    }
}

/// Every filter's verdict on one bar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterStates {
    pub checks: Vec<FilterCheck>,
}

impl FilterStates {
    pub fn all(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn get(&self, name: &str) -> Option<&FilterCheck> {
        self.checks.iter().find(|c| c.name == name)
    }

    pub fn to_map(&self) -> BTreeMap<String, bool> {
        self.checks
            .iter()
            .map(|c| (c.name.clone(), c.passed))
            .collect()
    }
}

pub struct FilterBank {
    filters: Vec<Box<dyn BarFilter>>,
}

impl FilterBank {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            filters: vec![
                Box::new(VolatilityFilter::new(&config.volatility)),
                Box::new(RegimeFilter::new(&config.regime)),
                Box::new(AdxFilter::new(&config.adx)),
            ],
        }
    }

    pub fn evaluate(&self, snapshot: &IndicatorSnapshot) -> FilterStates {
        FilterStates {
            checks: self.filters.iter().map(|f| f.evaluate(snapshot)).collect(),
        }
    }

    /// Names of the enabled filters.
    pub fn enabled(&self) -> Vec<&str> {
        self.filters
            .iter()
            .filter(|f| f.enabled())
            .map(|f| f.name())
            .collect()
    }
}

impl std::fmt::Debug for FilterBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterBank")
            .field("enabled", &self.enabled())
            .finish()
    }
}
