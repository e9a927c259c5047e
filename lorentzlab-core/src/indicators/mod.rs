//! Streaming indicator implementations.
//!
//! Every indicator owns its carry-state and advances by exactly one bar per
//! `update` call. Until its own warmup has elapsed an indicator returns `None`;
//! it never emits NaN because bars are sanitized before they get here.
//!
//! Value-level building blocks (EMA, RMA, SMA) expose `next(x)` so that
//! composed indicators (RSI, ADX, CCI, WaveTrend) can smooth arbitrary series.

pub mod adx;
pub mod atr;
pub mod cci;
pub mod ema;
pub mod engine;
pub mod normalize;
pub mod regime;
pub mod rsi;
pub mod sma;
pub mod wave_trend;

pub use adx::Adx;
pub use atr::{Atr, TrueRange};
pub use cci::Cci;
pub use ema::Ema;
pub use engine::{IndicatorEngine, IndicatorSnapshot};
pub use normalize::{rescale, RunningNormalizer};
pub use regime::RegimeSlope;
pub use rsi::Rsi;
pub use sma::Sma;
pub use wave_trend::WaveTrend;

use crate::domain::Bar;

/// Trait for streaming indicators.
///
/// # Look-ahead contamination guard
/// The value returned for bar t may only depend on bars `0..=t`. Every
/// indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "rsi_14", "atr_10").
    fn name(&self) -> &str;

    /// Index of the first bar that produces `Some` (bars before it are warmup).
    fn lookback(&self) -> usize;

    /// Advance by one bar.
    fn update(&mut self, bar: &Bar) -> Option<f64>;

    /// Drop all carry-state, as if no bar had been seen.
    fn reset(&mut self);
}

/// Run an indicator over a full bar series from a clean state.
///
/// Warmup bars are reported as `f64::NAN` so the output lines up 1:1 with
/// `bars`.
pub fn compute_series(indicator: &mut dyn Indicator, bars: &[Bar]) -> Vec<f64> {
    indicator.reset();
    bars.iter()
        .map(|b| indicator.update(b).unwrap_or(f64::NAN))
        .collect()
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                index: i,
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Create bars from explicit (open, high, low, close) tuples for testing.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| Bar {
            index: i,
            open,
            high,
            low,
            close,
            volume: 1000.0,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
