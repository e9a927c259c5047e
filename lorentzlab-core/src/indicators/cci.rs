//! Commodity Channel Index (CCI).
//!
//! CCI = (x - SMA(x, n)) / (0.015 * meanDev(x, n))
//! Lookback: period - 1.
//! Edge case: zero mean deviation (flat window) → 0.

use super::{Indicator, Sma};
use crate::domain::Bar;

const LAMBERT: f64 = 0.015;

#[derive(Debug, Clone)]
pub struct Cci {
    period: usize,
    window: Sma,
    name: String,
}

impl Cci {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "CCI period must be >= 1");
        Self {
            period,
            window: Sma::new(period),
            name: format!("cci_{period}"),
        }
    }

    pub fn next(&mut self, x: f64) -> Option<f64> {
        let mean = self.window.next(x)?;
        let dev = self.window.mean_deviation()?;
        if dev == 0.0 {
            return Some(0.0);
        }
        Some((x - mean) / (LAMBERT * dev))
    }
}

impl Indicator for Cci {
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
        self.window.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, compute_series, make_bars, DEFAULT_EPSILON};

    #[test]
    fn cci_known_value() {
        // window [1, 2, 3, 6]: mean 3, meanDev 1.5 → (6 - 3) / (0.015 * 1.5)
        let mut cci = Cci::new(4);
        let mut last = None;
        for x in [1.0, 2.0, 3.0, 6.0] {
            last = cci.next(x);
        }
        assert_approx(last.unwrap(), 3.0 / (0.015 * 1.5), 1e-9);
    }

    #[test]
    fn cci_flat_is_zero() {
        let bars = make_bars(&[10.0; 6]);
        let result = compute_series(&mut Cci::new(3), &bars);
        assert_approx(result[5], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn cci_sign_follows_price_vs_mean() {
        let mut up = Cci::new(3);
        let mut v = None;
        for x in [1.0, 2.0, 10.0] {
            v = up.next(x);
        }
        assert!(v.unwrap() > 0.0);

        let mut down = Cci::new(3);
        for x in [10.0, 9.0, 1.0] {
            v = down.next(x);
        }
        assert!(v.unwrap() < 0.0);
    }

    #[test]
    fn cci_lookback() {
        assert_eq!(Cci::new(20).lookback(), 19);
    }
}
