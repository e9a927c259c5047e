//! Per-symbol bar processor: the single entry point for callers.
//!
//! Each call advances every component by exactly one bar, in order:
//!
//! 1. Sanitize and append the bar to history
//! 2. Update filter/exit indicators
//! 3. Build the feature vector and append a training row (once labelable)
//! 4. Classify (gated by the warmup index)
//! 5. Update the kernel estimates
//! 6. Evaluate filters
//! 7. Advance the signal state machine and derive trade events

pub mod result;
pub mod snapshot;
pub mod warmup;

pub use result::BarResult;
pub use snapshot::{HistorySnapshot, SnapshotError};
pub use warmup::WarmupGate;

use tracing::{info, warn};

use crate::classifier::LorentzianClassifier;
use crate::config::{ConfigError, EngineConfig};
use crate::domain::{BarHistory, RawBar};
use crate::features::{FeatureBuilder, LabelGenerator, TrainingHistory, TrainingRow, LABEL_LAG};
use crate::filters::FilterBank;
use crate::fingerprint::FeatureHash;
use crate::indicators::IndicatorEngine;
use crate::kernel::KernelRegressionFilter;
use crate::signal::{OpenTrade, Signal, SignalInput, SignalStateMachine};

#[derive(Debug)]
pub struct BarProcessor {
    config: EngineConfig,
    bars: BarHistory,
    indicators: IndicatorEngine,
    features: FeatureBuilder,
    labels: LabelGenerator,
    training: TrainingHistory,
    classifier: LorentzianClassifier,
    kernel: KernelRegressionFilter,
    filters: FilterBank,
    signals: SignalStateMachine,
    warmup: WarmupGate,
    feature_hash: FeatureHash,
    next_index: usize,
    last_close: Option<f64>,
    repaired_bars: usize,
}

impl BarProcessor {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let kernel = KernelRegressionFilter::new(&config.kernel);
        let retention = config
            .max_bars_back
            .max(kernel.required_bars())
            .max(LABEL_LAG + 1);
        let features = FeatureBuilder::new(config.active_features());
        let indicators = IndicatorEngine::new(&config.filters, &config.exit);
        let feature_hash = FeatureHash::of(config.active_features(), config.max_bars_back);
        let warmup = WarmupGate::new(config.max_bars_back, config.total_bars);

        info!(
            features = %features
                .specs()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" "),
            indicators = %indicators.active().join(" "),
            neighbors = config.neighbors_count,
            max_bars_back = config.max_bars_back,
            warmup_index = warmup.index(),
            bars_until_predictions = warmup.bars_until_open(0),
            feature_hash = %feature_hash,
            "bar processor ready"
        );

        Ok(Self {
            bars: BarHistory::with_capacity(retention),
            indicators,
            features,
            labels: LabelGenerator::new(),
            training: TrainingHistory::with_capacity(config.max_bars_back),
            classifier: LorentzianClassifier::new(
                config.neighbors_count,
                config.max_bars_back,
                config.neighbor_memory,
            ),
            kernel,
            filters: FilterBank::new(&config.filters),
            signals: SignalStateMachine::new(&config.kernel, &config.filters, &config.exit),
            warmup,
            feature_hash,
            next_index: 0,
            last_close: None,
            repaired_bars: 0,
            config,
        })
    }

    /// Batch mode: the total bar count fixes the warmup index.
    pub fn with_total_bars(mut config: EngineConfig, total_bars: usize) -> Result<Self, ConfigError> {
        config.total_bars = Some(total_bars);
        Self::new(config)
    }

    /// Set (or clear, for streaming) the total bar count.
    pub fn set_total_bars(&mut self, total_bars: Option<usize>) {
        self.config.total_bars = total_bars;
        self.warmup.set_total_bars(total_bars);
        info!(?total_bars, warmup_index = self.warmup.index(), "warmup index updated");
    }

    /// Process all `bars` with a known total and collect the results.
    pub fn run_batch(config: EngineConfig, bars: &[RawBar]) -> Result<Vec<BarResult>, ConfigError> {
        let mut processor = Self::with_total_bars(config, bars.len())?;
        Ok(bars.iter().map(|b| processor.process(b)).collect())
    }

    pub fn process_bar(&mut self, open: f64, high: f64, low: f64, close: f64, volume: f64) -> BarResult {
        self.process(&RawBar::new(open, high, low, close, volume))
    }

    pub fn process(&mut self, raw: &RawBar) -> BarResult {
        let bar_index = self.next_index;
        self.next_index += 1;

        let (bar, repaired) = raw.sanitize(bar_index, self.last_close);
        if repaired {
            self.repaired_bars += 1;
            warn!(
                bar_index,
                open = raw.open,
                high = raw.high,
                low = raw.low,
                close = raw.close,
                volume = raw.volume,
                replacement = bar.close,
                "non-finite bar fields replaced"
            );
        }
        self.bars.push(bar);
        self.last_close = Some(bar.close);

        let snapshot = self.indicators.update(&bar);
        let vector = self.features.build(&bar);
        if let Some(label) = self.labels.generate(&self.bars) {
            self.training.push(TrainingRow {
                bar_index,
                features: vector,
                label,
            });
        }

        if self.warmup.observe(bar_index) {
            info!(
                bar_index,
                training_rows = self.training.len(),
                "warmup gate open, predictions enabled"
            );
        }
        let prediction =
            self.classifier
                .predict(&vector, &self.training, bar_index, self.warmup.index());

        let kernel = self.kernel.update(&self.bars);
        let filter_states = self.filters.evaluate(&snapshot);
        let filters_passed = filter_states.all();

        let (signal, events) = self.signals.update(&SignalInput {
            bar_index,
            prediction,
            filters_passed,
            kernel: kernel.as_ref(),
            indicators: &snapshot,
        });

        BarResult {
            bar_index,
            close: bar.close,
            prediction,
            prediction_strength: result::prediction_strength(prediction, self.config.neighbors_count),
            signal,
            filters_passed,
            filter_states: filter_states.to_map(),
            kernel,
            events,
            neighbor_count: self.classifier.state().len(),
            repaired,
        }
    }

    /// Training rows, oldest first, tagged with this engine's feature hash.
    pub fn history_snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            feature_hash: self.feature_hash.clone(),
            feature_count: self.features.feature_count(),
            rows: self.training.iter().copied().collect(),
        }
    }

    /// Replace the training history with a snapshot's rows.
    ///
    /// Rejected when the snapshot was produced under a different feature set.
    /// Only the newest `max_bars_back` rows are kept.
    pub fn restore_history(&mut self, snapshot: HistorySnapshot) -> Result<(), SnapshotError> {
        if snapshot.feature_hash != self.feature_hash {
            return Err(SnapshotError::FeatureHashMismatch {
                expected: self.feature_hash.clone(),
                found: snapshot.feature_hash,
            });
        }
        snapshot.check_rows(self.features.feature_count())?;

        self.training.clear();
        for row in snapshot.rows {
            self.training.push(row);
        }
        info!(rows = self.training.len(), "training history restored");
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Bars processed so far.
    pub fn bar_count(&self) -> usize {
        self.next_index
    }

    pub fn warmup_index(&self) -> usize {
        self.warmup.index()
    }

    pub fn signal(&self) -> Signal {
        self.signals.signal()
    }

    pub fn open_trade(&self) -> Option<&OpenTrade> {
        self.signals.open_trade()
    }

    pub fn training_len(&self) -> usize {
        self.training.len()
    }

    pub fn feature_hash(&self) -> &FeatureHash {
        &self.feature_hash
    }

    pub fn repaired_bars(&self) -> usize {
        self.repaired_bars
    }

    pub fn bars(&self) -> &BarHistory {
        &self.bars
    }
}
