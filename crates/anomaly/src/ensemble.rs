//! Anomaly Detector Ensemble
//!
//! Runs every detector whose input is present in a `MarketSeries`, collects
//! the anomalies, and records a `DetectorFailure` for any detector that
//! errors without stopping the others.

use crate::config::EnsembleConfig;
use crate::correlation::CorrelationBreakdownDetector;
use crate::error::Result;
use crate::outlier::OutlierDetector;
use crate::pattern::PatternDetector;
use crate::protocol::AnomalyDetector;
use crate::quiet::{QuietBeforeStormDetector, QuietThresholds};
use crate::regime::RegimeShiftDetector;
use serde::{Deserialize, Serialize};
use vigil_core::{Anomaly, AssetReturns, FeatureMatrix, MarketSeries, Timestamp};

/// A detector that errored during a pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorFailure {
    pub detector: String,
    pub reason: String,
}

/// Output of one ensemble pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnsembleReport {
    /// Anomalies by severity, highest first
    pub anomalies: Vec<Anomaly>,
    pub failures: Vec<DetectorFailure>,
    /// Detectors that ran, in run order
    pub ran: Vec<String>,
}

impl EnsembleReport {
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty() && self.failures.is_empty()
    }

    fn record<D: AnomalyDetector + ?Sized>(
        &mut self,
        detector: &mut D,
        input: &D::Input,
        at: Timestamp,
    ) {
        self.ran.push(detector.name().to_string());
        match detector.detect(input, at) {
            Ok(anomalies) => self.anomalies.extend(anomalies),
            Err(e) => {
                log::warn!("[ENSEMBLE] {} failed: {}", detector.name(), e);
                self.failures.push(DetectorFailure {
                    detector: detector.name().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }
}

pub struct AnomalyEnsemble {
    outlier: OutlierDetector,
    pattern: PatternDetector,
    regime: RegimeShiftDetector,
    correlation: CorrelationBreakdownDetector,
    quiet: QuietBeforeStormDetector,
}

impl AnomalyEnsemble {
    pub fn new(config: &EnsembleConfig) -> Self {
        let c = &config.calibration;
        Self {
            outlier: OutlierDetector::new(config.outlier_threshold, c.outlier_probability_cap),
            pattern: PatternDetector::new(
                config.pattern_latent_dim,
                config.pattern_seed,
                config.pattern_percentile,
                c.pattern_probability_factor,
            ),
            regime: RegimeShiftDetector::new(config.regime_window, c.regime_probability_factor),
            correlation: CorrelationBreakdownDetector::new(
                config.correlation_window,
                c.correlation_probability_factor,
                c.correlation_crisis_probability,
            ),
            quiet: QuietBeforeStormDetector::new(
                QuietThresholds::default(),
                c.quiet_storm_probability,
            ),
        }
    }

    /// Fit the outlier and pattern detectors on a normal-period sample
    pub fn fit(&mut self, normal: &FeatureMatrix) -> Result<()> {
        self.outlier.fit(normal)?;
        self.pattern.fit(normal)?;
        log::info!(
            "[ENSEMBLE] Fitted on {} rows x {} features",
            normal.n_rows(),
            normal.n_features()
        );
        Ok(())
    }

    /// Establish the correlation baseline from a historical window
    pub fn establish_correlation_baseline(&mut self, history: &AssetReturns) -> Result<()> {
        self.correlation.establish_baseline(history)
    }

    /// Run every detector whose input is present.
    ///
    /// Order: outlier, pattern, regime, correlation, quiet-before-storm.
    /// The final sort is stable so equal severities keep that order.
    pub fn detect(&mut self, series: &MarketSeries, at: Timestamp) -> EnsembleReport {
        let mut report = EnsembleReport::default();

        if let Some(features) = &series.features {
            report.record(&mut self.outlier, features, at);
            report.record(&mut self.pattern, features, at);
        }
        if let Some(returns) = &series.market_returns {
            report.record(&mut self.regime, returns.as_slice(), at);
        }
        if let Some(assets) = &series.asset_returns {
            report.record(&mut self.correlation, assets, at);
        }
        if let Some(snapshot) = &series.snapshot {
            report.record(&mut self.quiet, snapshot, at);
        }

        report
            .anomalies
            .sort_by(|a, b| b.severity.total_cmp(&a.severity));

        log::debug!(
            "[ENSEMBLE] {} detectors ran: {} anomalies, {} failures",
            report.ran.len(),
            report.anomalies.len(),
            report.failures.len()
        );
        report
    }

    pub fn outlier(&self) -> &OutlierDetector {
        &self.outlier
    }

    pub fn pattern(&self) -> &PatternDetector {
        &self.pattern
    }

    pub fn regime(&self) -> &RegimeShiftDetector {
        &self.regime
    }

    pub fn correlation(&self) -> &CorrelationBreakdownDetector {
        &self.correlation
    }

    pub fn quiet(&self) -> &QuietBeforeStormDetector {
        &self.quiet
    }
}

impl Default for AnomalyEnsemble {
    fn default() -> Self {
        Self::new(&EnsembleConfig::default())
    }
}
