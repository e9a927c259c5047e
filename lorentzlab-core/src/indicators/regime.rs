//! Regime slope: normalized decline of a Kalman-style trend line's slope.
//!
//! Source is ohlc4. Per bar:
//! v1    = 0.2 * (src - src[1]) + 0.8 * v1[1]
//! v2    = 0.1 * (high - low)   + 0.8 * v2[1]
//! omega = |v1 / v2|                          (0 when v2 == 0)
//! alpha = (-omega^2 + sqrt(omega^4 + 16 * omega^2)) / 8
//! klmf  = alpha * src + (1 - alpha) * klmf[1]   (seeded with the first src)
//! slope = |klmf - klmf[1]|
//! value = (slope - EMA(slope, n)) / EMA(slope, n)   (0 when the EMA is 0)
//!
//! Lookback: n (the first slope exists on the second bar).

use super::{Ema, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct RegimeSlope {
    period: usize,
    prev_src: Option<f64>,
    v1: f64,
    v2: f64,
    klmf: f64,
    slope_avg: Ema,
    name: String,
}

impl RegimeSlope {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "regime slope period must be >= 1");
        Self {
            period,
            prev_src: None,
            v1: 0.0,
            v2: 0.0,
            klmf: 0.0,
            slope_avg: Ema::new(period),
            name: format!("regime_{period}"),
        }
    }
}

impl Indicator for RegimeSlope {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn update(&mut self, bar: &Bar) -> Option<f64> {
        let src = bar.ohlc4();
        let Some(prev_src) = self.prev_src.replace(src) else {
            self.klmf = src;
            return None;
        };

        self.v1 = 0.2 * (src - prev_src) + 0.8 * self.v1;
        self.v2 = 0.1 * (bar.high - bar.low) + 0.8 * self.v2;
        let omega = if self.v2 == 0.0 {
            0.0
        } else {
            (self.v1 / self.v2).abs()
        };
        let omega_sq = omega * omega;
        let alpha = (-omega_sq + (omega_sq * omega_sq + 16.0 * omega_sq).sqrt()) / 8.0;

        let klmf = alpha * src + (1.0 - alpha) * self.klmf;
        let slope = (klmf - self.klmf).abs();
        self.klmf = klmf;

        let avg = self.slope_avg.next(slope)?;
        if avg == 0.0 {
            return Some(0.0);
        }
        Some((slope - avg) / avg)
    }

    fn reset(&mut self) {
        self.prev_src = None;
        self.v1 = 0.0;
        self.v2 = 0.0;
        self.klmf = 0.0;
        self.slope_avg.clear();
    }
}
