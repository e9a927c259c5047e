//! ADX: Average Directional Index (Wilder).
//!
//! Steps:
//! 1. Compute +DM and -DM from consecutive bars
//! 2. Smooth +DM, -DM, and TR using Wilder smoothing (alpha = 1/period)
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR)
//! 4. -DI = 100 * smoothed(-DM) / smoothed(TR)
//! 5. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 6. ADX = Wilder-smoothed DX
//!
//! Lookback: 2 * period - 1 (the first bar only seeds the previous high/low).

use super::{Ema, Indicator, TrueRange};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    prev: Option<(f64, f64)>,
    tr: TrueRange,
    tr_smooth: Ema,
    plus_smooth: Ema,
    minus_smooth: Ema,
    dx_smooth: Ema,
    name: String,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        Self {
            period,
            prev: None,
            tr: TrueRange::new(),
            tr_smooth: Ema::wilder(period),
            plus_smooth: Ema::wilder(period),
            minus_smooth: Ema::wilder(period),
            dx_smooth: Ema::wilder(period),
            name: format!("adx_{period}"),
        }
    }
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        2 * self.period - 1
    }

    fn update(&mut self, bar: &Bar) -> Option<f64> {
        let tr = self.tr.next(bar);
        let (prev_high, prev_low) = self.prev.replace((bar.high, bar.low))?;

        let up_move = bar.high - prev_high;
        let down_move = prev_low - bar.low;
        let plus_dm = if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        };
        let minus_dm = if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        };

        let tr_s = self.tr_smooth.next(tr);
        let plus_s = self.plus_smooth.next(plus_dm);
        let minus_s = self.minus_smooth.next(minus_dm);
        let (tr_s, plus_s, minus_s) = match (tr_s, plus_s, minus_s) {
            (Some(t), Some(p), Some(m)) => (t, p, m),
            _ => return None,
        };

        let dx = if tr_s == 0.0 {
            0.0
        } else {
            let plus_di = 100.0 * plus_s / tr_s;
            let minus_di = 100.0 * minus_s / tr_s;
            let di_sum = plus_di + minus_di;
            if di_sum == 0.0 {
                0.0
            } else {
                100.0 * (plus_di - minus_di).abs() / di_sum
            }
        };

        self.dx_smooth.next(dx)
    }

    fn reset(&mut self) {
        self.prev = None;
        self.tr.clear();
        self.tr_smooth.clear();
        self.plus_smooth.clear();
        self.minus_smooth.clear();
        self.dx_smooth.clear();
    }
}
