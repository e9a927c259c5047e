//! Engine configuration: every tunable of the classifier, kernel, filters and
//! exit policy, with reference-indicator defaults.
//!
//! Every section is `#[serde(default)]`, so a TOML document only has to name
//! the values it overrides. Construction never clamps silently: out-of-range
//! values are rejected by [`EngineConfig::validate`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::{FeatureKind, FeatureSpec, MAX_FEATURES};

/// Configuration errors, raised once at construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("neighbors_count must be > 0 (got {0})")]
    NeighborsCount(usize),
    #[error("feature_count must be in 1..={max} (got {count})", max = MAX_FEATURES)]
    FeatureCount { count: usize },
    #[error("feature_count is {count} but only {defined} feature definitions were given")]
    MissingFeature { count: usize, defined: usize },
    #[error("{name} must be >= 1 (got {value})")]
    InvalidPeriod { name: String, value: usize },
    #[error("max_bars_back must be > 0")]
    MaxBarsBack,
    #[error("invalid kernel settings: {0}")]
    Kernel(String),
    #[error("invalid filter settings: {0}")]
    Filter(String),
    #[error("invalid exit settings: {0}")]
    Exit(String),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// What the classifier keeps between bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborMemory {
    /// Neighbor list and acceptance threshold persist across bars (streaming).
    #[default]
    Carry,
    /// Both are reset before every scan (pure batch rescans).
    Fresh,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolatilityFilterConfig {
    pub enabled: bool,
    pub short_period: usize,
    pub long_period: usize,
    /// Short ATR must exceed `ratio` times the long ATR.
    pub ratio: f64,
}

impl Default for VolatilityFilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            short_period: 1,
            long_period: 10,
            ratio: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeFilterConfig {
    pub enabled: bool,
    pub threshold: f64,
    pub slope_period: usize,
}

impl Default for RegimeFilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: -0.1,
            slope_period: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdxFilterConfig {
    pub enabled: bool,
    pub period: usize,
    pub threshold: f64,
}

impl Default for AdxFilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            period: 14,
            threshold: 20.0,
        }
    }
}

/// Moving-average gate applied to entries only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendGateConfig {
    pub enabled: bool,
    pub period: usize,
}

impl Default for TrendGateConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            period: 200,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub volatility: VolatilityFilterConfig,
    pub regime: RegimeFilterConfig,
    pub adx: AdxFilterConfig,
    pub ema_trend: TrendGateConfig,
    pub sma_trend: TrendGateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Window length and bandwidth of both estimators.
    pub lookback: usize,
    /// Rational-quadratic alpha; large values approach the Gaussian kernel.
    pub relative_weight: f64,
    /// Minimum bars of history before estimates are reported.
    pub regression_level: usize,
    /// Offset of the lagged rational-quadratic estimate.
    pub lag: usize,
    /// Derive trend from the Gaussian/rational-quadratic crossover instead of
    /// the current-vs-lagged comparison.
    pub smoothing: bool,
    /// Require a matching kernel trend for entries.
    pub filter_entries: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            lookback: 8,
            relative_weight: 8.0,
            regression_level: 25,
            lag: 2,
            smoothing: false,
            filter_entries: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExitPolicy {
    /// Exit after `hold_bars` bars in the trade.
    Strict { hold_bars: usize },
    /// Exit when the kernel trend turns against the trade.
    Dynamic,
    /// Exit on an ATR-scaled stop or target measured from the entry close.
    AtrBracket {
        atr_period: usize,
        stop_mult: f64,
        target_mult: f64,
    },
}

impl Default for ExitPolicy {
    fn default() -> Self {
        ExitPolicy::Strict { hold_bars: 4 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitConfig {
    pub policy: ExitPolicy,
    /// Suppress entries when the signal flipped within this many bars of the
    /// previous flip. `None` disables the guard.
    pub early_flip_bars: Option<usize>,
}

/// Complete per-symbol engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub neighbors_count: usize,
    pub max_bars_back: usize,
    pub feature_count: usize,
    pub features: Vec<FeatureSpec>,
    /// Total bar count for batch/backtest runs; fixes the warmup index.
    pub total_bars: Option<usize>,
    pub neighbor_memory: NeighborMemory,
    pub filters: FilterConfig,
    pub kernel: KernelConfig,
    pub exit: ExitConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            neighbors_count: 8,
            max_bars_back: 2000,
            feature_count: 5,
            features: vec![
                FeatureSpec::new(FeatureKind::Rsi, 14, 1),
                FeatureSpec::new(FeatureKind::WaveTrend, 10, 11),
                FeatureSpec::new(FeatureKind::Cci, 20, 1),
                FeatureSpec::new(FeatureKind::Adx, 20, 2),
                FeatureSpec::new(FeatureKind::Rsi, 9, 1),
            ],
            total_bars: None,
            neighbor_memory: NeighborMemory::Carry,
            filters: FilterConfig::default(),
            kernel: KernelConfig::default(),
            exit: ExitConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// The feature slots in use (`features[..feature_count]`).
    pub fn active_features(&self) -> &[FeatureSpec] {
        let n = self.feature_count.min(self.features.len());
        &self.features[..n]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.neighbors_count == 0 {
            return Err(ConfigError::NeighborsCount(self.neighbors_count));
        }
        if self.max_bars_back == 0 {
            return Err(ConfigError::MaxBarsBack);
        }
        if !(1..=MAX_FEATURES).contains(&self.feature_count) {
            return Err(ConfigError::FeatureCount {
                count: self.feature_count,
            });
        }
        if self.features.len() < self.feature_count {
            return Err(ConfigError::MissingFeature {
                count: self.feature_count,
                defined: self.features.len(),
            });
        }
        for (slot, spec) in self.active_features().iter().enumerate() {
            check_period(&format!("feature {} param_a", slot + 1), spec.param_a)?;
            check_period(&format!("feature {} param_b", slot + 1), spec.param_b)?;
        }

        let k = &self.kernel;
        check_period("kernel.lookback", k.lookback)?;
        check_period("kernel.regression_level", k.regression_level)?;
        if !(k.relative_weight.is_finite() && k.relative_weight > 0.0) {
            return Err(ConfigError::Kernel(format!(
                "relative_weight must be a positive number (got {})",
                k.relative_weight
            )));
        }

        let f = &self.filters;
        check_period("filters.volatility.short_period", f.volatility.short_period)?;
        check_period("filters.volatility.long_period", f.volatility.long_period)?;
        if !(f.volatility.ratio.is_finite() && f.volatility.ratio > 0.0) {
            return Err(ConfigError::Filter(format!(
                "volatility.ratio must be a positive number (got {})",
                f.volatility.ratio
            )));
        }
        check_period("filters.regime.slope_period", f.regime.slope_period)?;
        if !f.regime.threshold.is_finite() {
            return Err(ConfigError::Filter("regime.threshold must be finite".into()));
        }
        check_period("filters.adx.period", f.adx.period)?;
        if !f.adx.threshold.is_finite() {
            return Err(ConfigError::Filter("adx.threshold must be finite".into()));
        }
        check_period("filters.ema_trend.period", f.ema_trend.period)?;
        check_period("filters.sma_trend.period", f.sma_trend.period)?;

        match &self.exit.policy {
            ExitPolicy::Strict { hold_bars } => check_period("exit.hold_bars", *hold_bars)?,
            ExitPolicy::Dynamic => {}
            ExitPolicy::AtrBracket {
                atr_period,
                stop_mult,
                target_mult,
            } => {
                check_period("exit.atr_period", *atr_period)?;
                for (name, v) in [("stop_mult", stop_mult), ("target_mult", target_mult)] {
                    if !(v.is_finite() && *v > 0.0) {
                        return Err(ConfigError::Exit(format!(
                            "{name} must be a positive number (got {v})"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

fn check_period(name: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidPeriod {
            name: name.to_string(),
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.active_features().len(), 5);
        assert_eq!(config.neighbors_count, 8);
        assert_eq!(config.max_bars_back, 2000);
        assert!(!config.filters.adx.enabled);
    }

    #[test]
    fn zero_neighbors_rejected() {
        let config = EngineConfig {
            neighbors_count: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NeighborsCount(0))
        ));
    }

    #[test]
    fn feature_count_out_of_range_rejected() {
        for count in [0, 6] {
            let config = EngineConfig {
                feature_count: count,
                ..EngineConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::FeatureCount { .. })
            ));
        }
    }

    #[test]
    fn feature_count_beyond_definitions_rejected() {
        let mut config = EngineConfig::default();
        config.features.truncate(2);
        config.feature_count = 3;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingFeature {
                count: 3,
                defined: 2
            }
        ));
    }

    #[test]
    fn zero_period_names_the_field() {
        let mut config = EngineConfig::default();
        config.kernel.lookback = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("kernel.lookback"));
    }

    #[test]
    fn bad_bracket_multiplier_rejected() {
        let mut config = EngineConfig::default();
        config.exit.policy = ExitPolicy::AtrBracket {
            atr_period: 14,
            stop_mult: -1.0,
            target_mult: 2.0,
        };
        assert!(matches!(config.validate(), Err(ConfigError::Exit(_))));
    }

    #[test]
    fn partial_toml_overrides_only_named_values() {
        let config = EngineConfig::from_toml_str(
            r#"
            neighbors_count = 12
            feature_count = 2

            [kernel]
            lookback = 10

            [filters.adx]
            enabled = true
            "#,
        )
        .unwrap();
        assert_eq!(config.neighbors_count, 12);
        assert_eq!(config.feature_count, 2);
        assert_eq!(config.kernel.lookback, 10);
        assert_eq!(config.kernel.regression_level, 25);
        assert!(config.filters.adx.enabled);
        assert_eq!(config.filters.adx.threshold, 20.0);
        assert!(config.filters.volatility.enabled);
    }

    #[test]
    fn toml_features_and_exit_policy() {
        let config = EngineConfig::from_toml_str(
            r#"
            feature_count = 2
            features = [
                { kind = "RSI", param_a = 7, param_b = 2 },
                { kind = "CCI", param_a = 14, param_b = 1 },
            ]

            [exit]
            early_flip_bars = 3
            policy = { kind = "atr_bracket", atr_period = 10, stop_mult = 1.0, target_mult = 2.0 }
            "#,
        )
        .unwrap();
        assert_eq!(config.features[1].kind, FeatureKind::Cci);
        assert_eq!(config.exit.early_flip_bars, Some(3));
        assert!(matches!(
            config.exit.policy,
            ExitPolicy::AtrBracket { atr_period: 10, .. }
        ));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = EngineConfig::from_toml_str("neighbors_count = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_values_in_toml_fail_validation() {
        let err = EngineConfig::from_toml_str("neighbors_count = 0").unwrap_err();
        assert!(matches!(err, ConfigError::NeighborsCount(0)));
    }
}
