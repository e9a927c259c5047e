//! Per-slot feature calculators.
//!
//! RSI(a,b): EMA(RSI(close, a), b) rescaled from 0..100 to 0..1.
//! WT(a,b):  WaveTrend(a, b) on hlc3, running min/max normalized.
//! CCI(a,b): EMA(CCI(close, a), b), running min/max normalized.
//! ADX(a,_): ADX(a) rescaled from 0..100 to 0..1.
//!
//! Edge case: until the slot's indicator chain is warm, the output is the
//! neutral midpoint 0.5.

use super::{FeatureKind, FeatureSpec};
use crate::domain::Bar;
use crate::indicators::{rescale, Adx, Cci, Ema, Indicator, Rsi, RunningNormalizer, WaveTrend};

/// Value reported while a slot is warming up.
pub const NEUTRAL_FEATURE: f64 = 0.5;

#[derive(Debug, Clone)]
pub enum FeatureCalculator {
    Rsi {
        rsi: Rsi,
        smooth: Ema,
    },
    WaveTrend {
        wt: WaveTrend,
        norm: RunningNormalizer,
    },
    Cci {
        cci: Cci,
        smooth: Ema,
        norm: RunningNormalizer,
    },
    Adx {
        adx: Adx,
    },
}

impl FeatureCalculator {
    pub fn new(spec: &FeatureSpec) -> Self {
        match spec.kind {
            FeatureKind::Rsi => FeatureCalculator::Rsi {
                rsi: Rsi::new(spec.param_a),
                smooth: Ema::new(spec.param_b),
            },
            FeatureKind::WaveTrend => FeatureCalculator::WaveTrend {
                wt: WaveTrend::new(spec.param_a, spec.param_b),
                norm: RunningNormalizer::new(),
            },
            FeatureKind::Cci => FeatureCalculator::Cci {
                cci: Cci::new(spec.param_a),
                smooth: Ema::new(spec.param_b),
                norm: RunningNormalizer::new(),
            },
            FeatureKind::Adx => FeatureCalculator::Adx {
                adx: Adx::new(spec.param_a),
            },
        }
    }

    /// Advance by one bar and return the normalized feature value.
    pub fn update(&mut self, bar: &Bar) -> f64 {
        self.raw_update(bar).unwrap_or(NEUTRAL_FEATURE)
    }

    fn raw_update(&mut self, bar: &Bar) -> Option<f64> {
        match self {
            FeatureCalculator::Rsi { rsi, smooth } => {
                let v = smooth.next(rsi.next(bar.close)?)?;
                Some(rescale(v, 0.0, 100.0, 0.0, 1.0))
            }
            FeatureCalculator::WaveTrend { wt, norm } => {
                let v = wt.next(bar.hlc3())?;
                Some(norm.normalize(v))
            }
            FeatureCalculator::Cci { cci, smooth, norm } => {
                let v = smooth.next(cci.next(bar.close)?)?;
                Some(norm.normalize(v))
            }
            FeatureCalculator::Adx { adx } => {
                let v = adx.update(bar)?;
                Some(rescale(v, 0.0, 100.0, 0.0, 1.0))
            }
        }
    }

    /// Bars of input before the slot reports a real value.
    pub fn lookback(&self) -> usize {
        match self {
            FeatureCalculator::Rsi { rsi, smooth } => rsi.lookback() + smooth.lookback(),
            FeatureCalculator::WaveTrend { wt, .. } => wt.lookback(),
            FeatureCalculator::Cci { cci, smooth, .. } => cci.lookback() + smooth.lookback(),
            FeatureCalculator::Adx { adx } => adx.lookback(),
        }
    }
}
