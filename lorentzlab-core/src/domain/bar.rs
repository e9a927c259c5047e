//! Bar: the fundamental market data unit.

use serde::{Deserialize, Serialize};

/// OHLCV values as handed over by the caller, before validation.
///
/// Fields may be non-finite; `sanitize` turns a raw bar into a [`Bar`] that is
/// safe to feed into recursive indicator state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl RawBar {
    pub fn new(open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Returns true if any OHLCV field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite())
    }

    /// Replace every non-finite field so no NaN reaches indicator state.
    ///
    /// OHLC fields fall back to `last_close` (the previous bar's close). When
    /// there is no previous bar the first finite OHLC field of this bar is used,
    /// and `0.0` when the bar has none. Volume falls back to zero.
    ///
    /// Returns the repaired bar and whether any field was replaced.
    pub fn sanitize(&self, index: usize, last_close: Option<f64>) -> (Bar, bool) {
        let fallback = last_close
            .filter(|c| c.is_finite())
            .or_else(|| {
                [self.close, self.open, self.high, self.low]
                    .into_iter()
                    .find(|v| v.is_finite())
            })
            .unwrap_or(0.0);

        let pick = |v: f64| if v.is_finite() { v } else { fallback };
        let bar = Bar {
            index,
            open: pick(self.open),
            high: pick(self.high),
            low: pick(self.low),
            close: pick(self.close),
            volume: if self.volume.is_finite() {
                self.volume
            } else {
                0.0
            },
        };
        (bar, self.is_void())
    }
}

/// A validated OHLCV bar with its position in the stream.
///
/// Immutable once appended to [`BarHistory`](super::BarHistory). All fields
/// are finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub index: usize,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// (high + low + close) / 3
    pub fn hlc3(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// (open + high + low + close) / 4
    pub fn ohlc4(&self) -> f64 {
        (self.open + self.high + self.low + self.close) / 4.0
    }

    /// Basic OHLC sanity check: high >= low, high >= open, high >= close, etc.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_raw() -> RawBar {
        RawBar::new(100.0, 105.0, 98.0, 103.0, 50_000.0)
    }

    #[test]
    fn finite_bar_passes_through() {
        let (bar, repaired) = sample_raw().sanitize(7, Some(99.0));
        assert!(!repaired);
        assert_eq!(bar.index, 7);
        assert_eq!(bar.close, 103.0);
        assert!(bar.is_sane());
    }

    #[test]
    fn nan_fields_take_previous_close() {
        let mut raw = sample_raw();
        raw.high = f64::NAN;
        raw.close = f64::INFINITY;
        let (bar, repaired) = raw.sanitize(1, Some(99.0));
        assert!(repaired);
        assert_eq!(bar.high, 99.0);
        assert_eq!(bar.close, 99.0);
        assert_eq!(bar.open, 100.0);
    }

    #[test]
    fn first_bar_falls_back_to_own_fields() {
        let raw = RawBar::new(f64::NAN, 101.0, f64::NAN, f64::NAN, f64::NAN);
        let (bar, repaired) = raw.sanitize(0, None);
        assert!(repaired);
        assert_eq!(bar.open, 101.0);
        assert_eq!(bar.close, 101.0);
        assert_eq!(bar.volume, 0.0);
    }

    #[test]
    fn fully_void_first_bar_is_zeroed() {
        let raw = RawBar::new(f64::NAN, f64::NAN, f64::NAN, f64::NAN, 1.0);
        let (bar, _) = raw.sanitize(0, None);
        assert_eq!(bar.close, 0.0);
        assert_eq!(bar.high, 0.0);
    }

    #[test]
    fn price_blends() {
        let (bar, _) = sample_raw().sanitize(0, None);
        assert!((bar.hlc3() - (105.0 + 98.0 + 103.0) / 3.0).abs() < 1e-12);
        assert!((bar.ohlc4() - (100.0 + 105.0 + 98.0 + 103.0) / 4.0).abs() < 1e-12);
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let (bar, _) = sample_raw().sanitize(3, None);
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
