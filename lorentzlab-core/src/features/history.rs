//! Training rows: one feature vector plus its label per historical bar.
//!
//! Rows are kept oldest-first and capped at `max_bars_back`; the oldest row
//! is dropped when the cap is exceeded. A row never changes after insertion.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::{FeatureVector, Label};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingRow {
    pub bar_index: usize,
    pub features: FeatureVector,
    pub label: Label,
}

#[derive(Debug, Clone)]
pub struct TrainingHistory {
    rows: VecDeque<TrainingRow>,
    capacity: usize,
}

impl TrainingHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            rows: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
        }
    }

    pub fn push(&mut self, row: TrainingRow) {
        debug_assert!(
            self.rows
                .back()
                .map_or(true, |last| last.features.len() == row.features.len()),
            "feature width changed between training rows"
        );
        if self.rows.len() == self.capacity {
            self.rows.pop_front();
        }
        self.rows.push_back(row);
        debug_assert!(self.rows.len() <= self.capacity);
    }

    /// Row at chronological offset `i` (0 = oldest retained).
    pub fn get(&self, i: usize) -> Option<&TrainingRow> {
        self.rows.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrainingRow> + '_ {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}
