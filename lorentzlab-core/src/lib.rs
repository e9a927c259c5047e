//! LorentzLab Core: streaming Lorentzian KNN signal engine.
//!
//! This crate turns a stream of OHLCV bars into trading signals:
//! - Domain types (bars, sliding bar history)
//! - Streaming indicators (RSI, WaveTrend, CCI, ADX, ATR, EMA/SMA, regime slope)
//! - Feature construction, causal labels and training history
//! - Approximate nearest-neighbor classification with Lorentzian distance
//! - Kernel regression trend estimates
//! - Volatility, regime and ADX filters
//! - Signal state machine with entry/exit events
//!
//! One [`BarProcessor`] per symbol; instances share nothing.

pub mod classifier;
pub mod config;
pub mod domain;
pub mod engine;
pub mod features;
pub mod filters;
pub mod fingerprint;
pub mod indicators;
pub mod kernel;
pub mod signal;

pub use config::{ConfigError, EngineConfig, ExitPolicy, NeighborMemory};
pub use domain::{Bar, RawBar};
pub use engine::{BarProcessor, BarResult, HistorySnapshot, SnapshotError};
pub use features::{FeatureKind, FeatureSpec, Label};
pub use kernel::{KernelEstimate, KernelTrend};
pub use signal::{Signal, TradeEvents};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: per-symbol engines can move to worker threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::BarHistory>();
        require_sync::<domain::BarHistory>();

        require_send::<config::EngineConfig>();
        require_sync::<config::EngineConfig>();
        require_send::<features::TrainingHistory>();
        require_sync::<features::TrainingHistory>();
        require_send::<classifier::LorentzianClassifier>();
        require_sync::<classifier::LorentzianClassifier>();
        require_send::<kernel::KernelRegressionFilter>();
        require_sync::<kernel::KernelRegressionFilter>();
        require_send::<filters::FilterBank>();
        require_sync::<filters::FilterBank>();
        require_send::<signal::SignalStateMachine>();
        require_sync::<signal::SignalStateMachine>();

        require_send::<engine::BarProcessor>();
        require_sync::<engine::BarProcessor>();
        require_send::<engine::BarResult>();
        require_sync::<engine::BarResult>();
        require_send::<engine::HistorySnapshot>();
        require_sync::<engine::HistorySnapshot>();
    }

    /// Architecture contract: filters see indicator values only.
    ///
    /// `BarFilter::evaluate` takes an `IndicatorSnapshot` and nothing else, so
    /// a filter cannot read signal or trade state.
    #[test]
    fn filter_trait_sees_only_indicators() {
        fn _check_trait_object_builds(
            filter: &dyn filters::BarFilter,
            snapshot: &indicators::IndicatorSnapshot,
        ) -> filters::FilterCheck {
            filter.evaluate(snapshot)
        }
    }

    #[test]
    fn streams_are_independent() {
        let mut config = EngineConfig::default();
        config.filters.volatility.enabled = false;
        let mut a = BarProcessor::new(config.clone()).unwrap();
        let mut b = BarProcessor::new(config).unwrap();
        for i in 0..50 {
            let x = 100.0 + (i as f64 * 0.2).sin();
            a.process_bar(x, x + 1.0, x - 1.0, x, 10.0);
        }
        assert_eq!(a.bar_count(), 50);
        assert_eq!(b.bar_count(), 0);
        assert_eq!(b.process_bar(1.0, 1.0, 1.0, 1.0, 1.0).bar_index, 0);
    }
}
