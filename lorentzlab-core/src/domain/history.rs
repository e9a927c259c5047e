//! Bounded sliding window of bars with newest-first lookup.

use std::collections::VecDeque;

use super::Bar;

/// Append-only bar window.
///
/// `get(0)` is always the most recently appended bar and `get(k)` the bar `k`
/// bars ago. Once `capacity` bars are held, appending drops the oldest one.
#[derive(Debug, Clone)]
pub struct BarHistory {
    bars: VecDeque<Bar>,
    capacity: usize,
}

impl BarHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            bars: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, bar: Bar) {
        if self.bars.len() == self.capacity {
            self.bars.pop_front();
        }
        self.bars.push_back(bar);
        debug_assert!(self.bars.len() <= self.capacity);
    }

    /// The bar `k` bars ago (0 = current).
    pub fn get(&self, k: usize) -> Option<&Bar> {
        let len = self.bars.len();
        if k >= len {
            return None;
        }
        self.bars.get(len - 1 - k)
    }

    /// `close[k]`.
    pub fn close(&self, k: usize) -> Option<f64> {
        self.get(k).map(|b| b.close)
    }

    pub fn latest(&self) -> Option<&Bar> {
        self.bars.back()
    }

    /// Closes from newest to oldest, starting `offset` bars back.
    pub fn closes_from(&self, offset: usize) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().rev().skip(offset).map(|b| b.close)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(index: usize, close: f64) -> Bar {
        Bar {
            index,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }

    #[test]
    fn newest_first_indexing() {
        let mut h = BarHistory::with_capacity(10);
        for i in 0..5 {
            h.push(bar(i, 100.0 + i as f64));
        }
        assert_eq!(h.close(0), Some(104.0));
        assert_eq!(h.close(4), Some(100.0));
        assert_eq!(h.close(5), None);
        assert_eq!(h.latest().map(|b| b.index), Some(4));
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut h = BarHistory::with_capacity(3);
        for i in 0..6 {
            h.push(bar(i, i as f64));
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.close(0), Some(5.0));
        assert_eq!(h.close(2), Some(3.0));
        assert_eq!(h.close(3), None);
    }

    #[test]
    fn closes_from_offset() {
        let mut h = BarHistory::with_capacity(10);
        for i in 0..4 {
            h.push(bar(i, i as f64));
        }
        let v: Vec<f64> = h.closes_from(1).collect();
        assert_eq!(v, vec![2.0, 1.0, 0.0]);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut h = BarHistory::with_capacity(0);
        h.push(bar(0, 1.0));
        h.push(bar(1, 2.0));
        assert_eq!(h.len(), 1);
        assert_eq!(h.close(0), Some(2.0));
    }
}
