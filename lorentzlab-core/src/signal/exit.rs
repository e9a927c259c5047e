//! Trade exits.
//!
//! An open trade always ends when the signal flips against it. On top of that
//! the configured policy adds one more exit rule:
//! - `Strict`: close after `hold_bars` bars in the trade.
//! - `Dynamic`: close when the kernel trend changes against the trade.
//! - `AtrBracket`: close when price reaches entry ∓ stop_mult·ATR (stop) or
//!   entry ± target_mult·ATR (target). ATR is taken at entry; if it was still
//!   warming then, the first later reading is used.

use serde::{Deserialize, Serialize};

use crate::config::ExitPolicy;
use crate::kernel::KernelEstimate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    SignalFlip,
    HoldExpired,
    KernelReversal,
    StopHit,
    TargetHit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpenTrade {
    pub side: Side,
    pub entry_bar: usize,
    pub entry_price: f64,
    pub entry_atr: Option<f64>,
}

impl OpenTrade {
    pub fn bars_held(&self, bar_index: usize) -> usize {
        bar_index.saturating_sub(self.entry_bar)
    }

    /// Stop and target prices, once the entry ATR is known.
    pub fn bracket(&self, stop_mult: f64, target_mult: f64) -> Option<(f64, f64)> {
        let atr = self.entry_atr?;
        Some(match self.side {
            Side::Long => (
                self.entry_price - stop_mult * atr,
                self.entry_price + target_mult * atr,
            ),
            Side::Short => (
                self.entry_price + stop_mult * atr,
                self.entry_price - target_mult * atr,
            ),
        })
    }
}

/// Policy exit for `trade` on this bar, not counting signal flips.
pub fn policy_exit(
    policy: &ExitPolicy,
    trade: &OpenTrade,
    bar_index: usize,
    close: f64,
    kernel: Option<&KernelEstimate>,
) -> Option<ExitReason> {
    match policy {
        ExitPolicy::Strict { hold_bars } => {
            (trade.bars_held(bar_index) >= *hold_bars).then_some(ExitReason::HoldExpired)
        }
        ExitPolicy::Dynamic => {
            let k = kernel?;
            let reversed = match trade.side {
                Side::Long => k.bearish_change,
                Side::Short => k.bullish_change,
            };
            reversed.then_some(ExitReason::KernelReversal)
        }
        ExitPolicy::AtrBracket {
            stop_mult,
            target_mult,
            ..
        } => {
            let (stop, target) = trade.bracket(*stop_mult, *target_mult)?;
            let (stopped, reached) = match trade.side {
                Side::Long => (close <= stop, close >= target),
                Side::Short => (close >= stop, close <= target),
            };
            if stopped {
                Some(ExitReason::StopHit)
            } else if reached {
                Some(ExitReason::TargetHit)
            } else {
                None
            }
        }
    }
}
