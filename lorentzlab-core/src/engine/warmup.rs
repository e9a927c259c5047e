//! Warmup gate: the first bar index at which predictions may be non-zero.
//!
//! With a known total bar count the index is `max(0, total_bars -
//! max_bars_back)`, fixed once from the total, never from the current bar.
//! Without one (live streaming) the index is 0 and the classifier is limited
//! only by the training history it has accumulated.

#[derive(Debug, Clone)]
pub struct WarmupGate {
    max_bars_back: usize,
    index: usize,
    opened: bool,
}

impl WarmupGate {
    pub fn new(max_bars_back: usize, total_bars: Option<usize>) -> Self {
        Self {
            max_bars_back,
            index: Self::index_for(max_bars_back, total_bars),
            opened: false,
        }
    }

    fn index_for(max_bars_back: usize, total_bars: Option<usize>) -> usize {
        total_bars.map_or(0, |total| total.saturating_sub(max_bars_back))
    }

    /// Switch between batch (`Some`) and streaming (`None`) mode.
    pub fn set_total_bars(&mut self, total_bars: Option<usize>) {
        self.index = Self::index_for(self.max_bars_back, total_bars);
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_open(&self, bar_index: usize) -> bool {
        bar_index >= self.index
    }

    /// Record that `bar_index` was processed; true only on the first bar the
    /// gate is open.
    pub fn observe(&mut self, bar_index: usize) -> bool {
        if self.opened || !self.is_open(bar_index) {
            return false;
        }
        self.opened = true;
        true
    }

    pub fn bars_until_open(&self, bar_index: usize) -> usize {
        self.index.saturating_sub(bar_index)
    }
}
