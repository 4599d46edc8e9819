use serde::{Deserialize, Serialize};
use std::fmt;

/// Five-point alert severity scale.
///
/// Variants are declared in ascending severity; the derived `Ord` follows
/// declaration order, so `Green < Yellow < Orange < Red < Black` always holds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertLevel {
    /// No elevated risk
    #[default]
    Green,
    /// Watch: indicators drifting past their yellow thresholds
    Yellow,
    /// Elevated: meaningful crisis probability
    Orange,
    /// Critical: crisis probable
    Red,
    /// Crisis is materializing now
    Black,
}

impl AlertLevel {
    /// All levels, least severe first
    pub const ALL: [AlertLevel; 5] = [
        AlertLevel::Green,
        AlertLevel::Yellow,
        AlertLevel::Orange,
        AlertLevel::Red,
        AlertLevel::Black,
    ];

    /// Map a crisis probability onto the scale.
    ///
    /// The top band is `Red` unless the caller reports the crisis is already
    /// materializing, in which case it is `Black`.
    pub fn from_probability(probability: f64, materializing: bool) -> Self {
        if probability >= 0.8 {
            if materializing {
                AlertLevel::Black
            } else {
                AlertLevel::Red
            }
        } else if probability >= 0.6 {
            AlertLevel::Orange
        } else if probability >= 0.4 {
            AlertLevel::Yellow
        } else {
            AlertLevel::Green
        }
    }

    /// Map an anomaly severity onto the scale (strict cutoffs, never `Black`)
    pub fn from_anomaly_severity(severity: f64) -> Self {
        if severity > 0.8 {
            AlertLevel::Red
        } else if severity > 0.6 {
            AlertLevel::Orange
        } else if severity > 0.4 {
            AlertLevel::Yellow
        } else {
            AlertLevel::Green
        }
    }

    /// Upper-case label used in summaries and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Green => "GREEN",
            AlertLevel::Yellow => "YELLOW",
            AlertLevel::Orange => "ORANGE",
            AlertLevel::Red => "RED",
            AlertLevel::Black => "BLACK",
        }
    }

    /// Returns true if the level calls for action beyond monitoring
    pub fn is_actionable(&self) -> bool {
        *self >= AlertLevel::Orange
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_order() {
        for pair in AlertLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(AlertLevel::Green < AlertLevel::Black);
        assert_eq!(
            AlertLevel::ALL.iter().copied().max(),
            Some(AlertLevel::Black)
        );
    }

    #[test]
    fn test_order_is_not_alphabetic() {
        // Alphabetically "BLACK" < "GREEN"; severity must disagree
        assert!(AlertLevel::Black.as_str() < AlertLevel::Green.as_str());
        assert!(AlertLevel::Black > AlertLevel::Green);
    }

    #[test]
    fn test_from_probability_bands() {
        assert_eq!(AlertLevel::from_probability(0.0, false), AlertLevel::Green);
        assert_eq!(AlertLevel::from_probability(0.39, false), AlertLevel::Green);
        assert_eq!(AlertLevel::from_probability(0.4, false), AlertLevel::Yellow);
        assert_eq!(AlertLevel::from_probability(0.6, false), AlertLevel::Orange);
        assert_eq!(AlertLevel::from_probability(0.8, false), AlertLevel::Red);
        assert_eq!(AlertLevel::from_probability(0.8, true), AlertLevel::Black);
        // Materializing only affects the top band
        assert_eq!(AlertLevel::from_probability(0.7, true), AlertLevel::Orange);
    }

    #[test]
    fn test_from_anomaly_severity_cutoffs_are_strict() {
        assert_eq!(AlertLevel::from_anomaly_severity(0.95), AlertLevel::Red);
        assert_eq!(AlertLevel::from_anomaly_severity(0.8), AlertLevel::Orange);
        assert_eq!(AlertLevel::from_anomaly_severity(0.6), AlertLevel::Yellow);
        assert_eq!(AlertLevel::from_anomaly_severity(0.4), AlertLevel::Green);
    }

    #[test]
    fn test_serde_labels() {
        let json = serde_json::to_string(&AlertLevel::Orange).unwrap();
        assert_eq!(json, "\"ORANGE\"");
        let level: AlertLevel = serde_json::from_str("\"BLACK\"").unwrap();
        assert_eq!(level, AlertLevel::Black);
    }
}
