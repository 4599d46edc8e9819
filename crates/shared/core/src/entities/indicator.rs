use crate::values::EPSILON;
use serde::{Deserialize, Serialize};

/// Static definition of a tracked indicator.
///
/// For a normal indicator higher values are riskier and `yellow <= red`.
/// For an inverted indicator (e.g. bank capital ratio) lower values are
/// riskier and `red <= yellow`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDefinition {
    /// Unique indicator name, used as the reading key
    pub name: String,
    /// Watch threshold
    pub yellow: f64,
    /// Critical threshold
    pub red: f64,
    /// Long-run historical average
    pub historical_average: f64,
    /// Accuracy proxy in [0, 1]
    pub reliability: f64,
    /// Typical lead time before onset, in months
    pub lead_time_months: u32,
    /// Lower values are riskier
    #[serde(default)]
    pub inverted: bool,
    /// Relative importance within a crisis-type scoring group
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl IndicatorDefinition {
    pub fn new(name: impl Into<String>, yellow: f64, red: f64, historical_average: f64) -> Self {
        Self {
            name: name.into(),
            yellow,
            red,
            historical_average,
            reliability: 1.0,
            lead_time_months: 12,
            inverted: false,
            weight: 1.0,
        }
    }

    pub fn with_reliability(mut self, reliability: f64) -> Self {
        self.reliability = reliability;
        self
    }

    pub fn with_lead_time(mut self, months: u32) -> Self {
        self.lead_time_months = months;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    /// Threshold interpolation of `value` into [0, 1].
    ///
    /// 0 at or past the yellow threshold on the safe side, 1 at or past the
    /// red threshold, linear in between. Equal thresholds fall back to an
    /// epsilon-wide range.
    pub fn threshold_score(&self, value: f64) -> f64 {
        let range = (self.red - self.yellow).abs().max(EPSILON);
        if self.inverted {
            if value <= self.red {
                1.0
            } else if value >= self.yellow {
                0.0
            } else {
                ((self.yellow - value) / range).clamp(0.0, 1.0)
            }
        } else if value >= self.red {
            1.0
        } else if value <= self.yellow {
            0.0
        } else {
            ((value - self.yellow) / range).clamp(0.0, 1.0)
        }
    }

    /// Value is at or past the red threshold
    pub fn is_red(&self, value: f64) -> bool {
        if self.inverted {
            value <= self.red
        } else {
            value >= self.red
        }
    }

    /// Value is at or past the yellow threshold
    pub fn is_yellow(&self, value: f64) -> bool {
        if self.inverted {
            value <= self.yellow
        } else {
            value >= self.yellow
        }
    }

    /// Deviation from the historical average in units of the
    /// average-to-yellow distance
    pub fn z_score(&self, value: f64) -> f64 {
        let scale = (self.yellow - self.historical_average).abs().max(EPSILON);
        (value - self.historical_average) / scale
    }
}
