//! Signal state machine and trade events.
//!
//! Transition, evaluated every bar:
//!   prediction > 0 and all filters pass → Long
//!   prediction < 0 and all filters pass → Short
//!   otherwise                           → previous signal
//!
//! Trade events are re-derived each bar. Exits run before entries, so a flip
//! closes the old trade and may open the new one on the same bar.

pub mod exit;

pub use exit::{policy_exit, ExitReason, OpenTrade, Side};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ExitConfig, ExitPolicy, FilterConfig, KernelConfig};
use crate::indicators::IndicatorSnapshot;
use crate::kernel::{KernelEstimate, KernelTrend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Long,
    Short,
    #[default]
    Neutral,
}

impl Signal {
    pub fn side(self) -> Option<Side> {
        match self {
            Signal::Long => Some(Side::Long),
            Signal::Short => Some(Side::Short),
            Signal::Neutral => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TradeEvents {
    pub start_long: bool,
    pub start_short: bool,
    pub end_long: bool,
    pub end_short: bool,
}

impl TradeEvents {
    pub fn any(&self) -> bool {
        self.start_long || self.start_short || self.end_long || self.end_short
    }
}

/// Everything the state machine reads on one bar.
#[derive(Debug, Clone, Copy)]
pub struct SignalInput<'a> {
    pub bar_index: usize,
    pub prediction: i32,
    pub filters_passed: bool,
    pub kernel: Option<&'a KernelEstimate>,
    pub indicators: &'a IndicatorSnapshot,
}

#[derive(Debug, Clone)]
pub struct SignalStateMachine {
    signal: Signal,
    last_flip_bar: Option<usize>,
    trade: Option<OpenTrade>,
    last_exit: Option<ExitReason>,
    policy: ExitPolicy,
    early_flip_bars: Option<usize>,
    kernel_gate: bool,
    ema_gate: bool,
    sma_gate: bool,
}

impl SignalStateMachine {
    pub fn new(kernel: &KernelConfig, filters: &FilterConfig, exit: &ExitConfig) -> Self {
        Self {
            signal: Signal::Neutral,
            last_flip_bar: None,
            trade: None,
            last_exit: None,
            policy: exit.policy.clone(),
            early_flip_bars: exit.early_flip_bars,
            kernel_gate: kernel.filter_entries,
            ema_gate: filters.ema_trend.enabled,
            sma_gate: filters.sma_trend.enabled,
        }
    }

    pub fn update(&mut self, input: &SignalInput<'_>) -> (Signal, TradeEvents) {
        let prev = self.signal;
        let next = if input.prediction > 0 && input.filters_passed {
            Signal::Long
        } else if input.prediction < 0 && input.filters_passed {
            Signal::Short
        } else {
            prev
        };
        let flipped = next != prev;
        self.signal = next;

        let mut suppressed = false;
        if flipped {
            suppressed = match (self.early_flip_bars, self.last_flip_bar) {
                (Some(n), Some(last)) => input.bar_index.saturating_sub(last) <= n,
                _ => false,
            };
            self.last_flip_bar = Some(input.bar_index);
            debug!(
                bar_index = input.bar_index,
                from = ?prev,
                to = ?next,
                prediction = input.prediction,
                suppressed,
                "signal changed"
            );
        }

        let mut events = TradeEvents::default();
        self.last_exit = None;

        if let Some(trade) = self.trade.as_mut() {
            if trade.entry_atr.is_none() {
                trade.entry_atr = input.indicators.exit_atr;
            }
        }
        if let Some(trade) = self.trade {
            let against = flipped && next.side() != Some(trade.side);
            let reason = if against {
                Some(ExitReason::SignalFlip)
            } else {
                policy_exit(
                    &self.policy,
                    &trade,
                    input.bar_index,
                    input.indicators.close,
                    input.kernel,
                )
            };
            if let Some(reason) = reason {
                match trade.side {
                    Side::Long => events.end_long = true,
                    Side::Short => events.end_short = true,
                }
                self.trade = None;
                self.last_exit = Some(reason);
                debug!(
                    bar_index = input.bar_index,
                    side = ?trade.side,
                    ?reason,
                    bars_held = trade.bars_held(input.bar_index),
                    "trade closed"
                );
            }
        }

        if flipped && !suppressed && self.trade.is_none() {
            if let Some(side) = next.side() {
                if self.entry_allowed(side, input) {
                    match side {
                        Side::Long => events.start_long = true,
                        Side::Short => events.start_short = true,
                    }
                    self.trade = Some(OpenTrade {
                        side,
                        entry_bar: input.bar_index,
                        entry_price: input.indicators.close,
                        entry_atr: input.indicators.exit_atr,
                    });
                    debug!(
                        bar_index = input.bar_index,
                        ?side,
                        price = input.indicators.close,
                        "trade opened"
                    );
                }
            }
        }

        (next, events)
    }

    fn entry_allowed(&self, side: Side, input: &SignalInput<'_>) -> bool {
        let wanted = match side {
            Side::Long => KernelTrend::Bullish,
            Side::Short => KernelTrend::Bearish,
        };
        let kernel_ok = !self.kernel_gate || input.kernel.is_some_and(|k| k.trend == wanted);

        let close = input.indicators.close;
        let gate = |enabled: bool, average: Option<f64>| {
            !enabled
                || average.is_some_and(|avg| match side {
                    Side::Long => close > avg,
                    Side::Short => close < avg,
                })
        };
        kernel_ok
            && gate(self.ema_gate, input.indicators.ema_trend)
            && gate(self.sma_gate, input.indicators.sma_trend)
    }

    pub fn signal(&self) -> Signal {
        self.signal
    }

    pub fn open_trade(&self) -> Option<&OpenTrade> {
        self.trade.as_ref()
    }

    /// Why the trade closed on the last bar, if one did.
    pub fn last_exit(&self) -> Option<ExitReason> {
        self.last_exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Harness {
        sm: SignalStateMachine,
        snapshot: IndicatorSnapshot,
        kernel: Option<KernelEstimate>,
        bar: usize,
    }

    impl Harness {
        fn new(kernel_gate: bool, exit: ExitConfig) -> Self {
            let kernel_cfg = KernelConfig {
                filter_entries: kernel_gate,
                ..KernelConfig::default()
            };
            Self {
                sm: SignalStateMachine::new(&kernel_cfg, &FilterConfig::default(), &exit),
                snapshot: IndicatorSnapshot {
                    close: 100.0,
                    ..IndicatorSnapshot::default()
                },
                kernel: None,
                bar: 0,
            }
        }

        fn step(&mut self, prediction: i32, filters_passed: bool) -> (Signal, TradeEvents) {
            let input = SignalInput {
                bar_index: self.bar,
                prediction,
                filters_passed,
                kernel: self.kernel.as_ref(),
                indicators: &self.snapshot,
            };
            self.bar += 1;
            self.sm.update(&input)
        }
    }

    fn long_hold() -> ExitConfig {
        ExitConfig {
            policy: ExitPolicy::Strict { hold_bars: 100 },
            early_flip_bars: None,
        }
    }

    fn trend(trend: KernelTrend) -> KernelEstimate {
        KernelEstimate {
            rational_quadratic: 100.0,
            lagged: 100.0,
            gaussian: 100.0,
            trend,
            bullish_cross: false,
            bearish_cross: false,
            bullish_change: false,
            bearish_change: false,
        }
    }

    #[test]
    fn starts_neutral_and_persists() {
        let mut h = Harness::new(false, long_hold());
        assert_eq!(h.step(0, true).0, Signal::Neutral);
        assert_eq!(h.step(3, true).0, Signal::Long);
        assert_eq!(h.step(0, true).0, Signal::Long);
        assert_eq!(h.step(-2, false).0, Signal::Long);
        assert_eq!(h.step(-2, true).0, Signal::Short);
    }

    #[test]
    fn entries_are_edge_triggered() {
        let mut h = Harness::new(false, long_hold());
        let (_, e1) = h.step(5, true);
        let (_, e2) = h.step(5, true);
        assert!(e1.start_long);
        assert!(!e2.any());
    }

    #[test]
    fn flip_closes_and_reopens_same_bar() {
        let mut h = Harness::new(false, long_hold());
        h.step(5, true);
        let (_, e) = h.step(-5, true);
        assert!(e.end_long && e.start_short);
        assert!(!e.start_long && !e.end_short);
        assert_eq!(h.sm.last_exit(), Some(ExitReason::SignalFlip));
        assert_eq!(h.sm.open_trade().unwrap().side, Side::Short);
    }

    #[test]
    fn strict_hold_expires() {
        let exit = ExitConfig {
            policy: ExitPolicy::Strict { hold_bars: 4 },
            early_flip_bars: None,
        };
        let mut h = Harness::new(false, exit);
        assert!(h.step(5, true).1.start_long);
        for _ in 0..3 {
            assert!(!h.step(5, true).1.end_long);
        }
        let (signal, e) = h.step(5, true);
        assert!(e.end_long);
        assert_eq!(signal, Signal::Long);
        assert_eq!(h.sm.last_exit(), Some(ExitReason::HoldExpired));
        assert!(h.sm.open_trade().is_none());
        // No re-entry without a fresh flip.
        assert!(!h.step(5, true).1.any());
    }

    #[test]
    fn kernel_gate_blocks_unconfirmed_entries() {
        let mut h = Harness::new(true, long_hold());
        let (signal, e) = h.step(5, true);
        assert_eq!(signal, Signal::Long);
        assert!(!e.start_long);

        h.kernel = Some(trend(KernelTrend::Bearish));
        let (_, e) = h.step(-5, true);
        assert!(e.start_short);
    }

    #[test]
    fn early_flip_guard_suppresses_quick_reversal() {
        let exit = ExitConfig {
            policy: ExitPolicy::Strict { hold_bars: 100 },
            early_flip_bars: Some(2),
        };
        let mut h = Harness::new(false, exit);
        assert!(h.step(5, true).1.start_long); // bar 0
        let (_, e) = h.step(-5, true); // bar 1: within 2 bars
        assert!(e.end_long);
        assert!(!e.start_short);
        h.step(0, true); // bar 2
        h.step(0, true); // bar 3
        h.step(0, true); // bar 4
        let (_, e) = h.step(5, true); // bar 5: 4 bars after the last flip
        assert!(e.start_long);
    }

    #[test]
    fn trend_gate_closed_when_average_missing() {
        let mut filters = FilterConfig::default();
        filters.ema_trend.enabled = true;
        let kernel_cfg = KernelConfig {
            filter_entries: false,
            ..KernelConfig::default()
        };
        let mut sm = SignalStateMachine::new(&kernel_cfg, &filters, &long_hold());
        let mut snapshot = IndicatorSnapshot {
            close: 100.0,
            ..IndicatorSnapshot::default()
        };
        let input = SignalInput {
            bar_index: 0,
            prediction: 5,
            filters_passed: true,
            kernel: None,
            indicators: &snapshot,
        };
        assert!(!sm.update(&input).1.start_long);

        snapshot.ema_trend = Some(90.0);
        let input = SignalInput {
            bar_index: 1,
            prediction: -5,
            filters_passed: true,
            kernel: None,
            indicators: &snapshot,
        };
        // Close above the average: shorts are blocked.
        assert!(!sm.update(&input).1.start_short);
        let input = SignalInput {
            bar_index: 2,
            prediction: 5,
            filters_passed: true,
            kernel: None,
            indicators: &snapshot,
        };
        assert!(sm.update(&input).1.start_long);
    }
}
