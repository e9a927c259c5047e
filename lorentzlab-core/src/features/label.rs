//! Training labels.
//!
//! label = Short if close[4] < close[0]
//!         Long  if close[4] > close[0]
//!         Neutral otherwise
//!
//! Only bars already in history are read, so a label never changes after it is
//! produced. No label exists until five bars have been seen.

use serde::{Deserialize, Serialize};

use crate::domain::BarHistory;

/// Bars between the compared closes.
pub const LABEL_LAG: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Long,
    Short,
    Neutral,
}

impl Label {
    pub fn value(self) -> i32 {
        match self {
            Label::Long => 1,
            Label::Short => -1,
            Label::Neutral => 0,
        }
    }

    /// Compare the close `LABEL_LAG` bars ago with the current close.
    pub fn from_closes(lagged: f64, current: f64) -> Self {
        if lagged < current {
            Label::Short
        } else if lagged > current {
            Label::Long
        } else {
            Label::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LabelGenerator;

impl LabelGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Label for the newest bar in `history`, or `None` with fewer than
    /// `LABEL_LAG + 1` bars.
    pub fn generate(&self, history: &BarHistory) -> Option<Label> {
        let current = history.close(0)?;
        let lagged = history.close(LABEL_LAG)?;
        Some(Label::from_closes(lagged, current))
    }
}
