//! Simple Moving Average (SMA).
//!
//! Rolling mean over a fixed window kept in a ring buffer. The same window
//! yields the mean absolute deviation used by CCI.
//! Lookback: period - 1 (first valid value at index period-1).

use std::collections::VecDeque;

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    window: VecDeque<f64>,
    sum: f64,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            window: VecDeque::with_capacity(period),
            sum: 0.0,
            name: format!("sma_{period}"),
        }
    }

    pub fn next(&mut self, x: f64) -> Option<f64> {
        if self.window.len() == self.period {
            if let Some(leaving) = self.window.pop_front() {
                self.sum -= leaving;
            }
        }
        self.window.push_back(x);
        self.sum += x;
        self.mean()
    }

    /// Mean of the current window, once it is full.
    pub fn mean(&self) -> Option<f64> {
        if self.window.len() < self.period {
            return None;
        }
        Some(self.sum / self.period as f64)
    }

    /// Mean absolute deviation of the window around its mean.
    pub fn mean_deviation(&self) -> Option<f64> {
        let mean = self.mean()?;
        let total: f64 = self.window.iter().map(|v| (v - mean).abs()).sum();
        Some(total / self.period as f64)
    }

    pub fn clear(&mut self) {
        self.window.clear();
        self.sum = 0.0;
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn update(&mut self, bar: &Bar) -> Option<f64> {
        self.next(bar.close)
    }

    fn reset(&mut self) {
        self.clear();
    }
}
