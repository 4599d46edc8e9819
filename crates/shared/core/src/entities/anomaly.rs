use crate::values::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anomaly category, one per detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    /// Feature z-score beyond the fitted threshold
    Outlier,
    /// Reconstruction error beyond the normal-sample percentile
    Pattern,
    /// Transition between return/volatility regimes
    RegimeShift,
    /// Correlation structure departed from baseline
    CorrelationBreak,
    /// Complacency: low volatility with high leverage and tight spreads
    QuietBeforeStorm,
}

impl AnomalyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyType::Outlier => "outlier",
            AnomalyType::Pattern => "pattern",
            AnomalyType::RegimeShift => "regime_shift",
            AnomalyType::CorrelationBreak => "correlation_break",
            AnomalyType::QuietBeforeStorm => "quiet_before_storm",
        }
    }
}

impl fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anomaly emitted by exactly one detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub anomaly_type: AnomalyType,
    /// Severity in [0, 1]
    pub severity: f64,
    pub timestamp: Timestamp,
    /// Indicators or assets involved
    pub affected: Vec<String>,
    pub description: String,
    /// Comparable historical episode, if any
    pub historical_precedent: Option<String>,
    /// Crisis probability estimate in [0, 1]
    pub crisis_probability: f64,
}

impl Anomaly {
    /// Create an anomaly; severity and probability are clamped to [0, 1]
    pub fn new(
        anomaly_type: AnomalyType,
        severity: f64,
        crisis_probability: f64,
        timestamp: Timestamp,
        description: impl Into<String>,
    ) -> Self {
        Self {
            anomaly_type,
            severity: severity.clamp(0.0, 1.0),
            timestamp,
            affected: Vec::new(),
            description: description.into(),
            historical_precedent: None,
            crisis_probability: crisis_probability.clamp(0.0, 1.0),
        }
    }

    pub fn with_affected<I, S>(mut self, affected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affected = affected.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_precedent(mut self, precedent: impl Into<String>) -> Self {
        self.historical_precedent = Some(precedent.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_values_are_clamped() {
        let anomaly = Anomaly::new(AnomalyType::Outlier, 1.7, -0.2, Utc::now(), "x");
        assert_eq!(anomaly.severity, 1.0);
        assert_eq!(anomaly.crisis_probability, 0.0);
    }

    #[test]
    fn test_builder() {
        let anomaly = Anomaly::new(AnomalyType::CorrelationBreak, 0.9, 0.85, Utc::now(), "x")
            .with_affected(["SPX", "HYG"])
            .with_precedent("2008");
        assert_eq!(anomaly.affected, vec!["SPX".to_string(), "HYG".to_string()]);
        assert_eq!(anomaly.historical_precedent.as_deref(), Some("2008"));
    }

    #[test]
    fn test_type_tags() {
        let json = serde_json::to_string(&AnomalyType::QuietBeforeStorm).unwrap();
        assert_eq!(json, "\"quiet_before_storm\"");
        assert_eq!(AnomalyType::RegimeShift.to_string(), "regime_shift");
    }
}
