//! Approximate nearest-neighbor classifier with Lorentzian distance.
//!
//! d(a, b) = Σ_j ln(1 + |a_j − b_j|)
//!
//! The scan walks training rows oldest-first over offsets
//! `0..=min(max_bars_back − 1, len − 1)`. Only offsets on the 4-bar stride
//! (`i % 4 == 0`) are candidates, and a candidate joins the neighbor set only
//! when its distance is at least the current acceptance threshold. Every scan
//! starts from the sentinel threshold; with [`NeighborMemory::Carry`] the
//! neighbor list survives between bars. The vote is the sum of neighbor labels.

pub mod neighbors;

pub use neighbors::{Neighbor, PredictionState, UNSET_DISTANCE};

use tracing::trace;

use crate::config::NeighborMemory;
use crate::features::{FeatureVector, TrainingHistory};

/// Spacing between eligible training rows.
pub const NEIGHBOR_STRIDE: usize = 4;

pub fn lorentzian_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    a.as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| (x - y).abs().ln_1p())
        .sum()
}

#[derive(Debug, Clone)]
pub struct LorentzianClassifier {
    max_bars_back: usize,
    memory: NeighborMemory,
    state: PredictionState,
    prediction: i32,
}

impl LorentzianClassifier {
    pub fn new(neighbors_count: usize, max_bars_back: usize, memory: NeighborMemory) -> Self {
        Self {
            max_bars_back,
            memory,
            state: PredictionState::new(neighbors_count),
            prediction: 0,
        }
    }

    /// Classify `current` against `history`.
    ///
    /// Bars before `warmup_index` skip the scan entirely, return 0 and leave
    /// the neighbor state untouched.
    pub fn predict(
        &mut self,
        current: &FeatureVector,
        history: &TrainingHistory,
        bar_index: usize,
        warmup_index: usize,
    ) -> i32 {
        if bar_index < warmup_index {
            self.prediction = 0;
            return 0;
        }
        match self.memory {
            NeighborMemory::Carry => self.state.begin_scan(),
            NeighborMemory::Fresh => self.state.reset(),
        }

        let mut accepted = 0usize;
        if !history.is_empty() {
            let last = (self.max_bars_back - 1).min(history.len() - 1);
            for i in (0..=last).step_by(NEIGHBOR_STRIDE) {
                let Some(row) = history.get(i) else { break };
                let d = lorentzian_distance(current, &row.features);
                if self.state.offer(d, row.label) {
                    accepted += 1;
                }
            }
        }
        debug_assert!(self.state.len() <= self.state.capacity());

        self.prediction = self.state.prediction();
        trace!(
            bar_index,
            prediction = self.prediction,
            accepted,
            neighbors = self.state.len(),
            last_distance = self.state.last_distance(),
            "neighbor scan"
        );
        self.prediction
    }

    pub fn prediction(&self) -> i32 {
        self.prediction
    }

    pub fn state(&self) -> &PredictionState {
        &self.state
    }

    pub fn neighbors_count(&self) -> usize {
        self.state.capacity()
    }
}
