//! WaveTrend oscillator (LazyBear), on hlc3.
//!
//! esa = EMA(src, n1)
//! d   = EMA(|src - esa|, n1)
//! ci  = (src - esa) / (0.015 * d)      (0 when d == 0)
//! wt1 = EMA(ci, n2)
//! wt2 = SMA(wt1, 4)
//! output = wt1 - wt2
//!
//! Lookback: 2 * (n1 - 1) + (n2 - 1) + 3.

use super::{Ema, Indicator, Sma};
use crate::domain::Bar;

const SIGNAL_PERIOD: usize = 4;

#[derive(Debug, Clone)]
pub struct WaveTrend {
    channel_period: usize,
    average_period: usize,
    esa: Ema,
    deviation: Ema,
    wt1: Ema,
    wt2: Sma,
    name: String,
}

impl WaveTrend {
    pub fn new(channel_period: usize, average_period: usize) -> Self {
        assert!(channel_period >= 1, "WaveTrend channel period must be >= 1");
        assert!(average_period >= 1, "WaveTrend average period must be >= 1");
        Self {
            channel_period,
            average_period,
            esa: Ema::new(channel_period),
            deviation: Ema::new(channel_period),
            wt1: Ema::new(average_period),
            wt2: Sma::new(SIGNAL_PERIOD),
            name: format!("wt_{channel_period}_{average_period}"),
        }
    }

    pub fn next(&mut self, src: f64) -> Option<f64> {
        let esa = self.esa.next(src)?;
        let d = self.deviation.next((src - esa).abs())?;
        let ci = if d == 0.0 {
            0.0
        } else {
            (src - esa) / (0.015 * d)
        };
        let wt1 = self.wt1.next(ci)?;
        let wt2 = self.wt2.next(wt1)?;
        Some(wt1 - wt2)
    }
}

impl Indicator for WaveTrend {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        2 * (self.channel_period - 1) + (self.average_period - 1) + (SIGNAL_PERIOD - 1)
    }

    fn update(&mut self, bar: &Bar) -> Option<f64> {
        self.next(bar.hlc3())
    }

    fn reset(&mut self) {
        self.esa.clear();
        self.deviation.clear();
        self.wt1.clear();
        self.wt2.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, compute_series, make_bars};

    #[test]
    fn first_value_at_lookback() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.4).sin() * 5.0).collect();
        let bars = make_bars(&closes);
        let mut wt = WaveTrend::new(5, 6);
        let lookback = wt.lookback();
        let result = compute_series(&mut wt, &bars);
        assert!(result[lookback - 1].is_nan());
        assert!(!result[lookback].is_nan());
    }

    #[test]
    fn flat_series_is_zero() {
        let mut wt = WaveTrend::new(3, 3);
        let mut last = None;
        for _ in 0..30 {
            last = wt.next(50.0);
        }
        assert_approx(last.unwrap(), 0.0, 1e-12);
    }

    #[test]
    fn name_encodes_params() {
        assert_eq!(WaveTrend::new(10, 11).name(), "wt_10_11");
        assert_eq!(WaveTrend::new(10, 11).lookback(), 18 + 10 + 3);
    }
}
