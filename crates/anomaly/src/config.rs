//! Ensemble configuration
//!
//! The severity-to-probability constants are empirical calibration values,
//! kept configurable rather than hard-coded in the detectors.

use serde::{Deserialize, Serialize};

/// Severity to crisis-probability calibration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyCalibration {
    /// Outlier probability = min(cap, severity)
    pub outlier_probability_cap: f64,
    /// Pattern probability = severity * factor
    pub pattern_probability_factor: f64,
    /// Regime-shift probability = severity * factor
    pub regime_probability_factor: f64,
    /// Pairwise correlation-break probability = severity * factor
    pub correlation_probability_factor: f64,
    /// Probability attached to the correlation crisis signature
    pub correlation_crisis_probability: f64,
    /// Probability attached to quiet-before-storm
    pub quiet_storm_probability: f64,
}

impl Default for AnomalyCalibration {
    fn default() -> Self {
        Self {
            outlier_probability_cap: 0.8,
            pattern_probability_factor: 0.75,
            regime_probability_factor: 0.9,
            correlation_probability_factor: 0.7,
            correlation_crisis_probability: 0.85,
            quiet_storm_probability: 0.6,
        }
    }
}

/// Parameters for every detector in the ensemble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    /// z-score above which a feature is an outlier
    pub outlier_threshold: f64,
    /// Latent width of the pattern projection; `None` means half the features (min 1)
    pub pattern_latent_dim: Option<usize>,
    /// Seed of the pattern projection
    pub pattern_seed: u64,
    /// Percentile of normal reconstruction errors used as the pattern threshold
    pub pattern_percentile: f64,
    /// Trailing returns used to classify the regime
    pub regime_window: usize,
    /// Trailing returns used for current correlations
    pub correlation_window: usize,
    pub calibration: AnomalyCalibration,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            outlier_threshold: 3.0,
            pattern_latent_dim: None,
            pattern_seed: 42,
            pattern_percentile: 95.0,
            regime_window: 20,
            correlation_window: 20,
            calibration: AnomalyCalibration::default(),
        }
    }
}
