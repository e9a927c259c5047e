//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|); the first
//! bar has no previous close and uses high-low.
//! ATR uses Wilder smoothing (EMA with alpha = 1/period).
//! Lookback: period - 1.

use super::{Ema, Indicator};
use crate::domain::Bar;

/// Streaming True Range; remembers the previous close.
#[derive(Debug, Clone, Default)]
pub struct TrueRange {
    prev_close: Option<f64>,
}

impl TrueRange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, bar: &Bar) -> f64 {
        let tr = match self.prev_close {
            Some(pc) => (bar.high - bar.low)
                .max((bar.high - pc).abs())
                .max((bar.low - pc).abs()),
            None => bar.high - bar.low,
        };
        self.prev_close = Some(bar.close);
        tr
    }

    pub fn clear(&mut self) {
        self.prev_close = None;
    }
}

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    tr: TrueRange,
    smooth: Ema,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            tr: TrueRange::new(),
            smooth: Ema::wilder(period),
            name: format!("atr_{period}"),
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.smooth.value()
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn update(&mut self, bar: &Bar) -> Option<f64> {
        let tr = self.tr.next(bar);
        self.smooth.next(tr)
    }

    fn reset(&mut self) {
        self.tr.clear();
        self.smooth.clear();
    }
}
