//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Neighbor bound: the neighbor set never exceeds `neighbors_count`
//! 2. Signal persistence: a signal only changes on a filtered, signed prediction
//! 3. Warmup gate: no prediction before the batch warmup index
//! 4. Replay determinism: identical inputs give identical outputs
//! 5. Trade events: ends always close a started trade

use proptest::prelude::*;

use lorentzlab_core::classifier::PredictionState;
use lorentzlab_core::{BarProcessor, EngineConfig, Label, RawBar, Signal};

// ── Strategies (proptest) ────────────────────────────────────────────

/// Random-walk bars built from per-bar moves and wick sizes.
fn arb_bars(min: usize, max: usize) -> impl Strategy<Value = Vec<RawBar>> {
    prop::collection::vec((-3.0..3.0_f64, 0.0..2.0_f64, 0.0..2.0_f64), min..max).prop_map(
        |steps| {
            let mut price = 100.0;
            steps
                .into_iter()
                .map(|(mv, up, down)| {
                    let open = price;
                    price = (price + mv).max(1.0);
                    RawBar::new(
                        open,
                        open.max(price) + up,
                        open.min(price) - down,
                        price,
                        1000.0,
                    )
                })
                .collect()
        },
    )
}

fn arb_label() -> impl Strategy<Value = Label> {
    prop_oneof![Just(Label::Long), Just(Label::Short), Just(Label::Neutral)]
}

fn small_config(neighbors_count: usize, max_bars_back: usize) -> EngineConfig {
    EngineConfig {
        neighbors_count,
        max_bars_back,
        ..EngineConfig::default()
    }
}

// ── 1. Neighbor bound ───────────────────────────────────────────────

proptest! {
    #[test]
    fn prediction_state_never_exceeds_capacity(
        capacity in 1usize..12,
        offers in prop::collection::vec((0.0..10.0_f64, arb_label()), 0..200),
    ) {
        let mut state = PredictionState::new(capacity);
        for (d, label) in offers {
            state.offer(d, label);
            prop_assert!(state.len() <= capacity);
            prop_assert!(state.prediction().unsigned_abs() as usize <= capacity);
        }
    }

    #[test]
    fn engine_neighbor_count_bounded(
        bars in arb_bars(20, 250),
        k in 1usize..10,
    ) {
        let mut p = BarProcessor::new(small_config(k, 120)).unwrap();
        for bar in &bars {
            let r = p.process(bar);
            prop_assert!(r.neighbor_count <= k);
            prop_assert!(r.prediction.unsigned_abs() as usize <= k);
        }
    }
}

// ── 2. Signal persistence ───────────────────────────────────────────

proptest! {
    #[test]
    fn signal_changes_only_on_filtered_prediction(bars in arb_bars(20, 300)) {
        let mut p = BarProcessor::new(small_config(8, 150)).unwrap();
        let mut prev = Signal::Neutral;
        for bar in &bars {
            let r = p.process(bar);
            if r.signal != prev {
                prop_assert!(r.filters_passed);
                match r.signal {
                    Signal::Long => prop_assert!(r.prediction > 0),
                    Signal::Short => prop_assert!(r.prediction < 0),
                    Signal::Neutral => prop_assert!(false, "signal returned to neutral"),
                }
            }
            prev = r.signal;
        }
    }
}

// ── 3. Warmup gate ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn no_prediction_before_warmup_index(
        bars in arb_bars(60, 200),
        window in 10usize..60,
    ) {
        let results = BarProcessor::run_batch(small_config(8, window), &bars).unwrap();
        let warmup = bars.len() - window;
        for r in &results[..warmup] {
            prop_assert_eq!(r.prediction, 0);
        }
    }
}

// ── 4. Replay determinism ───────────────────────────────────────────

proptest! {
    #[test]
    fn replay_determinism(bars in arb_bars(10, 200)) {
        let a = BarProcessor::run_batch(EngineConfig::default(), &bars).unwrap();
        let b = BarProcessor::run_batch(EngineConfig::default(), &bars).unwrap();
        prop_assert_eq!(a, b);
    }
}

// ── 5. Trade events ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn trade_events_pair_up(bars in arb_bars(20, 300)) {
        let mut config = small_config(8, 150);
        config.kernel.filter_entries = false;
        let mut p = BarProcessor::new(config).unwrap();
        let mut open: Option<Signal> = None;
        for bar in &bars {
            let e = p.process(bar).events;
            prop_assert!(!(e.start_long && e.start_short));
            if e.end_long {
                prop_assert_eq!(open, Some(Signal::Long));
                open = None;
            }
            if e.end_short {
                prop_assert_eq!(open, Some(Signal::Short));
                open = None;
            }
            if e.start_long {
                prop_assert_eq!(open, None);
                open = Some(Signal::Long);
            }
            if e.start_short {
                prop_assert_eq!(open, None);
                open = Some(Signal::Short);
            }
        }
    }
}
