use super::{AlertLevel, CrisisType};
use crate::values::Timestamp;
use serde::{Deserialize, Serialize};

/// One indicator's contribution to a warning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorContribution {
    pub name: String,
    /// Reading used for this pass
    pub value: f64,
    /// Normalized deviation from the historical average
    pub z_score: f64,
    /// Threshold-interpolated score in [0, 1]
    pub score: f64,
}

/// Result of scoring one crisis type in one pass.
///
/// Built fresh on every pass and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarlyWarning {
    pub crisis_type: CrisisType,
    pub level: AlertLevel,
    /// Crisis probability in [0, 1]
    pub probability: f64,
    /// Estimated months until onset (>= 1)
    pub months_to_crisis: u32,
    /// Up to five indicators with the largest |z-score|
    pub contributing_indicators: Vec<IndicatorContribution>,
    /// Mean reliability of the indicators that contributed
    pub confidence: f64,
    /// Historical crises with a matching fingerprint, best first
    pub similar_crises: Vec<String>,
    /// Recommended actions, most urgent first
    pub recommended_actions: Vec<String>,
    pub timestamp: Timestamp,
}

impl EarlyWarning {
    /// Short one-line description
    pub fn headline(&self) -> String {
        format!(
            "{} risk {:.0}% ({} months, confidence {:.0}%)",
            self.crisis_type,
            self.probability * 100.0,
            self.months_to_crisis,
            self.confidence * 100.0
        )
    }
}
