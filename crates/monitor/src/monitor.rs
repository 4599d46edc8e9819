//! Crisis Monitor
//!
//! The alert aggregator. Idle until a check is due (poll interval elapsed on
//! its clock) or forced; then runs the early-warning scan and the anomaly
//! ensemble side by side, merges the output into one `AggregationResult` and
//! appends it to a bounded history.

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::result::AggregationResult;
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;
use vigil_anomaly::{AnomalyEnsemble, EnsembleReport};
use vigil_clock::SystemClock;
use vigil_core::{AssetReturns, FeatureMatrix, IndicatorReadings, MarketSeries, Timestamp};
use vigil_early_warning::{Catalog, EarlyWarningSystem, load_default_catalog};
use vigil_ports::Clock;

pub struct CrisisMonitor {
    config: MonitorConfig,
    clock: Arc<dyn Clock>,
    warnings: EarlyWarningSystem,
    ensemble: AnomalyEnsemble,
    /// Most recent growth readings, newest last
    growth: VecDeque<f64>,
    last_check: Option<Timestamp>,
    history: VecDeque<AggregationResult>,
}

impl CrisisMonitor {
    pub fn new(config: MonitorConfig, catalog: Arc<Catalog>, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        log::info!(
            "[MONITOR] Created with catalog {} (poll every {}s, clock {})",
            catalog.version(),
            config.poll_interval_secs,
            clock.name()
        );
        Ok(Self {
            ensemble: AnomalyEnsemble::new(&config.ensemble),
            warnings: EarlyWarningSystem::new(catalog),
            growth: VecDeque::with_capacity(config.materializing_after),
            history: VecDeque::with_capacity(config.history_capacity),
            last_check: None,
            config,
            clock,
        })
    }

    /// Monitor over the embedded default catalog
    pub fn with_default_catalog(config: MonitorConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let catalog = load_default_catalog()?;
        Self::new(config, Arc::new(catalog), clock)
    }

    /// Monitor over the default catalog on wall-clock time
    pub fn system(config: MonitorConfig) -> Result<Self> {
        Self::with_default_catalog(config, Arc::new(SystemClock::new()))
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn early_warning_system(&self) -> &EarlyWarningSystem {
        &self.warnings
    }

    pub fn ensemble(&self) -> &AnomalyEnsemble {
        &self.ensemble
    }

    /// Fit the outlier and pattern detectors on a normal-period sample
    pub fn fit_detectors(&mut self, normal: &FeatureMatrix) -> Result<()> {
        self.ensemble.fit(normal)?;
        Ok(())
    }

    /// Establish the correlation-breakdown baseline
    pub fn establish_correlation_baseline(&mut self, history: &AssetReturns) -> Result<()> {
        self.ensemble.establish_correlation_baseline(history)?;
        Ok(())
    }

    /// When the next scheduled check falls due; `None` before the first
    /// pass or when the due time lies beyond the calendar
    pub fn next_due(&self) -> Option<Timestamp> {
        self.last_check
            .and_then(|t| t.checked_add_signed(self.config.poll_interval()))
    }

    pub fn is_due(&self) -> bool {
        match self.last_check {
            None => true,
            Some(_) => self.next_due().is_some_and(|due| self.clock.now() >= due),
        }
    }

    /// Run a pass if forced or due; otherwise return the last result as is.
    pub fn check(
        &mut self,
        readings: &IndicatorReadings,
        series: &MarketSeries,
        force: bool,
    ) -> AggregationResult {
        if !force
            && !self.is_due()
            && let Some(last) = self.history.back()
        {
            log::debug!(
                "[MONITOR] Check not due until {:?}, returning last result",
                self.next_due()
            );
            return last.clone();
        }
        self.run_pass(readings, series)
    }

    fn run_pass(&mut self, readings: &IndicatorReadings, series: &MarketSeries) -> AggregationResult {
        let now = self.clock.now();
        let materializing = self.track_growth(readings);

        let warnings = &self.warnings;
        let ensemble = &mut self.ensemble;
        let (early_warnings, report) = thread::scope(|s| {
            let scan = s.spawn(move || warnings.scan(readings, materializing, now));
            let report: EnsembleReport = ensemble.detect(series, now);
            let early_warnings = scan.join().unwrap_or_else(|e| std::panic::resume_unwind(e));
            (early_warnings, report)
        });

        let result = AggregationResult::new(
            now,
            materializing,
            early_warnings,
            report.anomalies,
            report.failures,
        );

        if let Some(previous) = self.history.back().map(|r| r.highest_severity)
            && result.highest_severity > previous
        {
            log::warn!(
                "[MONITOR] Severity escalated {} -> {}",
                previous,
                result.highest_severity
            );
        }
        log::info!(
            "[MONITOR] Pass complete: {} ({} entries, {} failures)",
            result.highest_severity,
            result.entries.len(),
            result.failures.len()
        );

        self.last_check = Some(now);
        self.history.push_back(result.clone());
        while self.history.len() > self.config.history_capacity {
            self.history.pop_front();
        }
        result
    }

    /// Record this pass's growth reading and report whether the last
    /// `materializing_after` readings were all negative
    fn track_growth(&mut self, readings: &IndicatorReadings) -> bool {
        if let Some(&growth) = readings.get(&self.config.growth_indicator)
            && growth.is_finite()
        {
            self.growth.push_back(growth);
            while self.growth.len() > self.config.materializing_after {
                self.growth.pop_front();
            }
        }
        self.is_materializing()
    }

    pub fn is_materializing(&self) -> bool {
        self.growth.len() >= self.config.materializing_after && self.growth.iter().all(|g| *g < 0.0)
    }

    pub fn last_result(&self) -> Option<&AggregationResult> {
        self.history.back()
    }

    /// Retained results, oldest first
    pub fn history(&self) -> impl ExactSizeIterator<Item = &AggregationResult> {
        self.history.iter()
    }

    /// Human-readable rendering of the last result
    pub fn summary(&self) -> String {
        match self.history.back() {
            Some(result) => result.to_string(),
            None => "Crisis monitor: no checks run yet".to_string(),
        }
    }

    /// One line per retained pass, oldest first
    pub fn history_summary(&self) -> String {
        if self.history.is_empty() {
            return "Crisis monitor: no checks run yet".to_string();
        }
        self.history
            .iter()
            .map(AggregationResult::digest)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
