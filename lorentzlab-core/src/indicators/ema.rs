//! Exponential Moving Average (EMA) and Wilder's smoothing (RMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1]
//! Seed: EMA[period-1] = SMA of the first `period` values.
//! EMA uses alpha = 2 / (period + 1); RMA (Wilder) uses alpha = 1 / period.
//! Lookback: period - 1.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    alpha: f64,
    seed_sum: f64,
    seen: usize,
    value: Option<f64>,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self::with_alpha(period, 2.0 / (period as f64 + 1.0), format!("ema_{period}"))
    }

    /// Wilder smoothing, as used by RSI, ATR and ADX.
    pub fn wilder(period: usize) -> Self {
        assert!(period >= 1, "RMA period must be >= 1");
        Self::with_alpha(period, 1.0 / period as f64, format!("rma_{period}"))
    }

    fn with_alpha(period: usize, alpha: f64, name: String) -> Self {
        Self {
            period,
            alpha,
            seed_sum: 0.0,
            seen: 0,
            value: None,
            name,
        }
    }

    /// Feed one value; returns the smoothed value once seeded.
    pub fn next(&mut self, x: f64) -> Option<f64> {
        match self.value {
            Some(prev) => {
                let v = self.alpha * x + (1.0 - self.alpha) * prev;
                self.value = Some(v);
            }
            None => {
                self.seed_sum += x;
                self.seen += 1;
                if self.seen == self.period {
                    self.value = Some(self.seed_sum / self.period as f64);
                }
            }
        }
        self.value
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn clear(&mut self) {
        self.seed_sum = 0.0;
        self.seen = 0;
        self.value = None;
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn update(&mut self, bar: &Bar) -> Option<f64> {
        self.next(bar.close)
    }

    fn reset(&mut self) {
        self.clear();
    }
}
