//! Nadaraya-Watson kernel regression over closes.
//!
//! Rational quadratic: w(k) = (1 + k² / (2·α·h²))^(−α)
//! Gaussian:           w(k) = exp(−k² / (2·h²))
//! estimate = Σ w(k)·close[offset + k] / Σ w(k),  k = 0..lookback−1, h = lookback
//!
//! Estimates are reported only once `max(lookback + lag, regression_level)`
//! bars are in history; before that the filter returns `None`.

use serde::{Deserialize, Serialize};

use crate::config::KernelConfig;
use crate::domain::BarHistory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelTrend {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

/// Kernel readings on one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelEstimate {
    pub rational_quadratic: f64,
    /// Rational-quadratic estimate starting `lag` bars back.
    pub lagged: f64,
    pub gaussian: f64,
    pub trend: KernelTrend,
    /// Gaussian crossed above the rational-quadratic estimate this bar.
    pub bullish_cross: bool,
    pub bearish_cross: bool,
    /// Trend turned Bullish from Bearish this bar.
    pub bullish_change: bool,
    pub bearish_change: bool,
}

fn weighted_mean(
    history: &BarHistory,
    offset: usize,
    lookback: usize,
    weight: impl Fn(f64) -> f64,
) -> Option<f64> {
    if history.len() < offset + lookback {
        return None;
    }
    let mut num = 0.0;
    let mut den = 0.0;
    for (k, close) in history.closes_from(offset).take(lookback).enumerate() {
        let w = weight(k as f64);
        num += w * close;
        den += w;
    }
    (den > 0.0).then(|| num / den)
}

pub fn rational_quadratic(
    history: &BarHistory,
    offset: usize,
    lookback: usize,
    relative_weight: f64,
) -> Option<f64> {
    let h2 = (lookback * lookback) as f64;
    weighted_mean(history, offset, lookback, |k| {
        (1.0 + k * k / (2.0 * relative_weight * h2)).powf(-relative_weight)
    })
}

pub fn gaussian(history: &BarHistory, offset: usize, lookback: usize) -> Option<f64> {
    let h2 = (lookback * lookback) as f64;
    weighted_mean(history, offset, lookback, |k| (-k * k / (2.0 * h2)).exp())
}

#[derive(Debug, Clone)]
pub struct KernelRegressionFilter {
    config: KernelConfig,
    prev: Option<KernelEstimate>,
}

impl KernelRegressionFilter {
    pub fn new(config: &KernelConfig) -> Self {
        Self {
            config: config.clone(),
            prev: None,
        }
    }

    /// Bars required before estimates are reported.
    pub fn required_bars(&self) -> usize {
        (self.config.lookback + self.config.lag).max(self.config.regression_level)
    }

    /// Estimate on the newest bar of `history`. Call once per bar.
    pub fn update(&mut self, history: &BarHistory) -> Option<KernelEstimate> {
        if history.len() < self.required_bars() {
            return None;
        }
        let cfg = &self.config;
        let rq = rational_quadratic(history, 0, cfg.lookback, cfg.relative_weight)?;
        let lagged = rational_quadratic(history, cfg.lag, cfg.lookback, cfg.relative_weight)?;
        let gauss = gaussian(history, 0, cfg.lookback)?;

        let trend = if cfg.smoothing {
            direction(gauss, rq)
        } else {
            direction(rq, lagged)
        };

        let (bullish_cross, bearish_cross, bullish_change, bearish_change) = match &self.prev {
            Some(p) => (
                gauss > rq && p.gaussian <= p.rational_quadratic,
                gauss < rq && p.gaussian >= p.rational_quadratic,
                trend == KernelTrend::Bullish && p.trend == KernelTrend::Bearish,
                trend == KernelTrend::Bearish && p.trend == KernelTrend::Bullish,
            ),
            None => (false, false, false, false),
        };

        let estimate = KernelEstimate {
            rational_quadratic: rq,
            lagged,
            gaussian: gauss,
            trend,
            bullish_cross,
            bearish_cross,
            bullish_change,
            bearish_change,
        };
        self.prev = Some(estimate);
        Some(estimate)
    }

    pub fn last(&self) -> Option<&KernelEstimate> {
        self.prev.as_ref()
    }
}

fn direction(fast: f64, slow: f64) -> KernelTrend {
    if fast > slow {
        KernelTrend::Bullish
    } else if fast < slow {
        KernelTrend::Bearish
    } else {
        KernelTrend::Neutral
    }
}
