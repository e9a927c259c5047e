//! Bounded neighbor set with a rising acceptance threshold.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::features::Label;

/// Sentinel threshold that accepts the first eligible candidate.
pub const UNSET_DISTANCE: f64 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub distance: f64,
    pub label: Label,
}

/// Neighbor list, acceptance threshold and the resulting vote.
///
/// Invariant: `neighbors.len() <= capacity` after every `offer`.
#[derive(Debug, Clone)]
pub struct PredictionState {
    capacity: usize,
    last_distance: f64,
    neighbors: VecDeque<Neighbor>,
}

impl PredictionState {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            capacity,
            last_distance: UNSET_DISTANCE,
            neighbors: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Offer a candidate. Accepted when its distance is not below the current
    /// threshold. Returns whether it was accepted.
    ///
    /// On overflow the threshold moves to the distance at the 75th-percentile
    /// position of the list, then the oldest neighbor is evicted.
    pub fn offer(&mut self, distance: f64, label: Label) -> bool {
        if distance < self.last_distance {
            return false;
        }
        self.last_distance = distance;
        self.neighbors.push_back(Neighbor { distance, label });
        if self.neighbors.len() > self.capacity {
            let pivot = (self.capacity as f64 * 0.75).round() as usize;
            if let Some(n) = self.neighbors.get(pivot) {
                self.last_distance = n.distance;
            }
            self.neighbors.pop_front();
        }
        debug_assert!(self.neighbors.len() <= self.capacity);
        true
    }

    /// Sum of neighbor labels, in `[-capacity, capacity]`.
    pub fn prediction(&self) -> i32 {
        self.neighbors.iter().map(|n| n.label.value()).sum()
    }

    pub fn last_distance(&self) -> f64 {
        self.last_distance
    }

    pub fn neighbors(&self) -> impl Iterator<Item = &Neighbor> + '_ {
        self.neighbors.iter()
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Start a new scan: the threshold returns to the sentinel, the neighbor
    /// list is kept.
    pub fn begin_scan(&mut self) {
        self.last_distance = UNSET_DISTANCE;
    }

    /// Back to an empty list and the sentinel threshold.
    pub fn reset(&mut self) {
        self.last_distance = UNSET_DISTANCE;
        self.neighbors.clear();
    }
}
