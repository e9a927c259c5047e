//! Per-bar indicator bundle for filters, trend gates and exits.
//!
//! Built once from configuration: only the indicators some enabled consumer
//! needs are instantiated. Each bar is pushed through every live indicator
//! exactly once, and the results are published as an [`IndicatorSnapshot`].

use serde::{Deserialize, Serialize};

use super::{Adx, Atr, Ema, Indicator, RegimeSlope, Sma};
use crate::config::{ExitConfig, ExitPolicy, FilterConfig};
use crate::domain::Bar;

/// Indicator values on one bar. `None` means disabled or still warming up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub atr_short: Option<f64>,
    pub atr_long: Option<f64>,
    pub regime_slope: Option<f64>,
    pub adx: Option<f64>,
    pub ema_trend: Option<f64>,
    pub sma_trend: Option<f64>,
    pub exit_atr: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    atr_short: Option<Atr>,
    atr_long: Option<Atr>,
    regime: Option<RegimeSlope>,
    adx: Option<Adx>,
    ema_trend: Option<Ema>,
    sma_trend: Option<Sma>,
    exit_atr: Option<Atr>,
}

impl IndicatorEngine {
    pub fn new(filters: &FilterConfig, exit: &ExitConfig) -> Self {
        let vol = &filters.volatility;
        let exit_atr = match exit.policy {
            ExitPolicy::AtrBracket { atr_period, .. } => Some(Atr::new(atr_period)),
            _ => None,
        };
        Self {
            atr_short: vol.enabled.then(|| Atr::new(vol.short_period)),
            atr_long: vol.enabled.then(|| Atr::new(vol.long_period)),
            regime: filters
                .regime
                .enabled
                .then(|| RegimeSlope::new(filters.regime.slope_period)),
            adx: filters.adx.enabled.then(|| Adx::new(filters.adx.period)),
            ema_trend: filters
                .ema_trend
                .enabled
                .then(|| Ema::new(filters.ema_trend.period)),
            sma_trend: filters
                .sma_trend
                .enabled
                .then(|| Sma::new(filters.sma_trend.period)),
            exit_atr,
        }
    }

    pub fn update(&mut self, bar: &Bar) -> IndicatorSnapshot {
        IndicatorSnapshot {
            close: bar.close,
            atr_short: step(&mut self.atr_short, bar),
            atr_long: step(&mut self.atr_long, bar),
            regime_slope: step(&mut self.regime, bar),
            adx: step(&mut self.adx, bar),
            ema_trend: step(&mut self.ema_trend, bar),
            sma_trend: step(&mut self.sma_trend, bar),
            exit_atr: step(&mut self.exit_atr, bar),
        }
    }

    /// Names of the live indicators, for diagnostics.
    pub fn active(&self) -> Vec<&str> {
        let slots: [Option<&dyn Indicator>; 7] = [
            self.atr_short.as_ref().map(|i| i as &dyn Indicator),
            self.atr_long.as_ref().map(|i| i as &dyn Indicator),
            self.regime.as_ref().map(|i| i as &dyn Indicator),
            self.adx.as_ref().map(|i| i as &dyn Indicator),
            self.ema_trend.as_ref().map(|i| i as &dyn Indicator),
            self.sma_trend.as_ref().map(|i| i as &dyn Indicator),
            self.exit_atr.as_ref().map(|i| i as &dyn Indicator),
        ];
        slots.into_iter().flatten().map(|i| i.name()).collect()
    }
}

fn step<I: Indicator>(slot: &mut Option<I>, bar: &Bar) -> Option<f64> {
    slot.as_mut().and_then(|ind| ind.update(bar))
}
