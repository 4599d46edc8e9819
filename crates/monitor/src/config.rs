//! Monitor configuration

use crate::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use vigil_anomaly::EnsembleConfig;

/// Longest accepted poll interval: ten years
pub const MAX_POLL_INTERVAL_SECS: u64 = 10 * 366 * 86_400;

/// Crisis monitor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between scheduled checks
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Aggregation results retained in history
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Reading tracked for materialization
    #[serde(default = "default_growth_indicator")]
    pub growth_indicator: String,
    /// Consecutive negative growth readings that mark a crisis as materializing
    #[serde(default = "default_materializing_after")]
    pub materializing_after: usize,
    #[serde(default)]
    pub ensemble: EnsembleConfig,
}

fn default_poll_interval_secs() -> u64 {
    3600
}

fn default_history_capacity() -> usize {
    100
}

fn default_growth_indicator() -> String {
    "gdp_growth".to_string()
}

fn default_materializing_after() -> usize {
    2
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            history_capacity: default_history_capacity(),
            growth_indicator: default_growth_indicator(),
            materializing_after: default_materializing_after(),
            ensemble: EnsembleConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Saturates at `TimeDelta::MAX` for intervals chrono cannot represent
    pub fn poll_interval(&self) -> chrono::TimeDelta {
        i64::try_from(self.poll_interval_secs)
            .ok()
            .and_then(chrono::TimeDelta::try_seconds)
            .unwrap_or(chrono::TimeDelta::MAX)
    }

    /// Reject settings the monitor cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            return Err(MonitorError::InvalidConfig(
                "poll_interval_secs must be positive".into(),
            ));
        }
        if self.poll_interval_secs > MAX_POLL_INTERVAL_SECS {
            return Err(MonitorError::InvalidConfig(format!(
                "poll_interval_secs must be at most {}",
                MAX_POLL_INTERVAL_SECS
            )));
        }
        if self.history_capacity == 0 {
            return Err(MonitorError::InvalidConfig(
                "history_capacity must be positive".into(),
            ));
        }
        if self.materializing_after == 0 {
            return Err(MonitorError::InvalidConfig(
                "materializing_after must be positive".into(),
            ));
        }
        let e = &self.ensemble;
        if e.outlier_threshold.is_nan() || e.outlier_threshold <= 0.0 {
            return Err(MonitorError::InvalidConfig(
                "outlier_threshold must be positive".into(),
            ));
        }
        if !(0.0..=100.0).contains(&e.pattern_percentile) {
            return Err(MonitorError::InvalidConfig(
                "pattern_percentile must be within [0, 100]".into(),
            ));
        }
        if e.regime_window < 2 || e.correlation_window < 2 {
            return Err(MonitorError::InvalidConfig(
                "regime and correlation windows need at least 2 observations".into(),
            ));
        }
        Ok(())
    }
}

/// Load monitor configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MonitorConfig> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load monitor configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<MonitorConfig> {
    let config: MonitorConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.poll_interval(), chrono::Duration::hours(1));
        assert_eq!(config.history_capacity, 100);
        assert_eq!(config.growth_indicator, "gdp_growth");
        assert_eq!(config.materializing_after, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = load_config_from_str(
            r#"{"poll_interval_secs": 60, "ensemble": {"outlier_threshold": 2.5}}"#,
        )
        .unwrap();
        assert_eq!(config.poll_interval_secs, 60);
        assert_eq!(config.history_capacity, 100);
        assert_eq!(config.ensemble.outlier_threshold, 2.5);
        assert_eq!(config.ensemble.pattern_seed, 42);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            load_config_from_str(r#"{"history_capacity": 0}"#),
            Err(MonitorError::InvalidConfig(_))
        ));
        assert!(matches!(
            load_config_from_str(r#"{"ensemble": {"regime_window": 1}}"#),
            Err(MonitorError::InvalidConfig(_))
        ));
        assert!(matches!(
            load_config_from_str("not json"),
            Err(MonitorError::Parse(_))
        ));
    }

    #[test]
    fn test_poll_interval_upper_bound() {
        let too_long = format!(r#"{{"poll_interval_secs": {}}}"#, MAX_POLL_INTERVAL_SECS + 1);
        assert!(matches!(
            load_config_from_str(&too_long),
            Err(MonitorError::InvalidConfig(_))
        ));
        assert!(matches!(
            load_config_from_str(r#"{"poll_interval_secs": 1000000000000000}"#),
            Err(MonitorError::InvalidConfig(_))
        ));

        let longest = format!(r#"{{"poll_interval_secs": {}}}"#, MAX_POLL_INTERVAL_SECS);
        let config = load_config_from_str(&longest).unwrap();
        assert_eq!(config.poll_interval(), chrono::TimeDelta::days(10 * 366));
    }

    #[test]
    fn test_unrepresentable_interval_saturates() {
        let config = MonitorConfig {
            poll_interval_secs: u64::MAX,
            ..MonitorConfig::default()
        };
        assert_eq!(config.poll_interval(), chrono::TimeDelta::MAX);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_config("/nonexistent/vigil.json"),
            Err(MonitorError::Io(_))
        ));
    }
}
