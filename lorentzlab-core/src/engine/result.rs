use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::kernel::KernelEstimate;
use crate::signal::{Signal, TradeEvents};

/// Everything the engine reports for one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarResult {
    pub bar_index: usize,
    pub close: f64,
    /// Sum of neighbor labels, in `[-neighbors_count, neighbors_count]`.
    pub prediction: i32,
    /// `|prediction| / neighbors_count`, in `[0, 1]`.
    pub prediction_strength: f64,
    pub signal: Signal,
    pub filters_passed: bool,
    pub filter_states: BTreeMap<String, bool>,
    /// `None` until the kernel has enough history.
    pub kernel: Option<KernelEstimate>,
    pub events: TradeEvents,
    pub neighbor_count: usize,
    /// A non-finite input field was replaced on this bar.
    pub repaired: bool,
}

pub(crate) fn prediction_strength(prediction: i32, neighbors_count: usize) -> f64 {
    if neighbors_count == 0 {
        return 0.0;
    }
    (prediction.unsigned_abs() as f64 / neighbors_count as f64).min(1.0)
}
