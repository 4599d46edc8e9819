//! Aggregation results
//!
//! One `AggregationResult` per monitor pass: early warnings and anomalies
//! merged into a single ranked list of `AlertEntry`s.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use vigil_anomaly::DetectorFailure;
use vigil_core::{AlertLevel, Anomaly, EarlyWarning, Timestamp};

/// Which engine produced an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    EarlyWarning(EarlyWarning),
    Anomaly(Anomaly),
}

impl EntrySource {
    pub fn tag(&self) -> &'static str {
        match self {
            EntrySource::EarlyWarning(_) => "early_warning",
            EntrySource::Anomaly(_) => "anomaly",
        }
    }
}

/// One ranked line of an aggregation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEntry {
    pub source: EntrySource,
    pub title: String,
    pub level: AlertLevel,
    /// Probability for early warnings, severity for anomalies
    pub score: f64,
    pub detail: String,
}

impl From<EarlyWarning> for AlertEntry {
    fn from(warning: EarlyWarning) -> Self {
        Self {
            title: warning.crisis_type.display_name().to_string(),
            level: warning.level,
            score: warning.probability,
            detail: warning.headline(),
            source: EntrySource::EarlyWarning(warning),
        }
    }
}

impl From<Anomaly> for AlertEntry {
    fn from(anomaly: Anomaly) -> Self {
        Self {
            title: anomaly.anomaly_type.as_str().to_string(),
            level: AlertLevel::from_anomaly_severity(anomaly.severity),
            score: anomaly.severity,
            detail: anomaly.description.clone(),
            source: EntrySource::Anomaly(anomaly),
        }
    }
}

impl fmt::Display for AlertEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({:.2})",
            self.level,
            self.source.tag(),
            self.title,
            self.score
        )
    }
}

/// Output of one monitor pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub id: Uuid,
    pub timestamp: Timestamp,
    pub highest_severity: AlertLevel,
    pub materializing: bool,
    pub entries: Vec<AlertEntry>,
    pub failures: Vec<DetectorFailure>,
}

impl AggregationResult {
    /// Merge and rank one pass worth of output.
    ///
    /// Early warnings come first by level then probability, anomalies follow
    /// by severity. Both sorts are stable.
    pub fn new(
        timestamp: Timestamp,
        materializing: bool,
        mut warnings: Vec<EarlyWarning>,
        mut anomalies: Vec<Anomaly>,
        failures: Vec<DetectorFailure>,
    ) -> Self {
        warnings.sort_by(|a, b| {
            b.level
                .cmp(&a.level)
                .then_with(|| b.probability.total_cmp(&a.probability))
        });
        anomalies.sort_by(|a, b| b.severity.total_cmp(&a.severity));

        let highest_severity = highest_severity(&warnings, &anomalies);
        let entries = warnings
            .into_iter()
            .map(AlertEntry::from)
            .chain(anomalies.into_iter().map(AlertEntry::from))
            .collect();

        Self {
            id: Uuid::new_v4(),
            timestamp,
            highest_severity,
            materializing,
            entries,
            failures,
        }
    }

    pub fn early_warnings(&self) -> impl Iterator<Item = &EarlyWarning> {
        self.entries.iter().filter_map(|e| match &e.source {
            EntrySource::EarlyWarning(w) => Some(w),
            EntrySource::Anomaly(_) => None,
        })
    }

    pub fn anomalies(&self) -> impl Iterator<Item = &Anomaly> {
        self.entries.iter().filter_map(|e| match &e.source {
            EntrySource::Anomaly(a) => Some(a),
            EntrySource::EarlyWarning(_) => None,
        })
    }

    /// One-line digest for history listings
    pub fn digest(&self) -> String {
        format!(
            "{} {} ({} entries, {} failures)",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.highest_severity,
            self.entries.len(),
            self.failures.len()
        )
    }
}

/// Worst early-warning level; anomaly severity only when there are no
/// early warnings at all
fn highest_severity(warnings: &[EarlyWarning], anomalies: &[Anomaly]) -> AlertLevel {
    if let Some(level) = warnings.iter().map(|w| w.level).max() {
        return level;
    }
    anomalies
        .iter()
        .map(|a| a.severity)
        .max_by(f64::total_cmp)
        .map(AlertLevel::from_anomaly_severity)
        .unwrap_or_default()
}

impl fmt::Display for AggregationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Crisis monitor @ {}: highest severity {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.highest_severity
        )?;
        if self.materializing {
            write!(f, " (materializing)")?;
        }
        if self.entries.is_empty() {
            write!(f, "\n  no alerts")?;
        }
        for entry in &self.entries {
            write!(f, "\n  {}", entry)?;
        }
        for failure in &self.failures {
            write!(f, "\n  ! {} failed: {}", failure.detector, failure.reason)?;
        }
        Ok(())
    }
}
