//! Assembles the per-bar feature vector from the configured slots.

use super::{FeatureCalculator, FeatureSpec, FeatureVector, MAX_FEATURES};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    specs: Vec<FeatureSpec>,
    calculators: Vec<FeatureCalculator>,
}

impl FeatureBuilder {
    /// `specs` are the active slots only; callers validate the count first.
    pub fn new(specs: &[FeatureSpec]) -> Self {
        debug_assert!(!specs.is_empty() && specs.len() <= MAX_FEATURES);
        Self {
            specs: specs.to_vec(),
            calculators: specs.iter().map(FeatureCalculator::new).collect(),
        }
    }

    /// Advance every slot by one bar. Must be called exactly once per bar.
    pub fn build(&mut self, bar: &Bar) -> FeatureVector {
        let mut values = [0.0; MAX_FEATURES];
        for (slot, calc) in values.iter_mut().zip(self.calculators.iter_mut()) {
            *slot = calc.update(bar);
        }
        FeatureVector::from_slice(&values[..self.calculators.len()])
    }

    pub fn feature_count(&self) -> usize {
        self.calculators.len()
    }

    pub fn specs(&self) -> &[FeatureSpec] {
        &self.specs
    }

    /// Bars until every slot reports a real value.
    pub fn warmup_bars(&self) -> usize {
        self.calculators
            .iter()
            .map(FeatureCalculator::lookback)
            .max()
            .unwrap_or(0)
    }
}
