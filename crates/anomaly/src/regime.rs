//! Regime-Shift Detector
//!
//! Classifies a trailing window of returns into one of four return and
//! volatility regimes and reports transitions between them. The current
//! regime and the classification history are owned by the detector and only
//! move forward.

use crate::error::{DetectorError, Result};
use crate::protocol::AnomalyDetector;
use serde::{Deserialize, Serialize};
use std::fmt;
use vigil_core::stats::{self, TRADING_DAYS_PER_YEAR};
use vigil_core::{Anomaly, AnomalyType, Timestamp};

const NAME: &str = "regime_shift";

/// Annualized volatility above which a window is high-vol
pub const VOLATILITY_CUTOFF: f64 = 0.15;

/// Return/volatility regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Positive mean return, low volatility
    LowVolGrowth,
    /// Positive mean return, high volatility
    HighVolGrowth,
    /// Non-positive mean return, low volatility
    LowVolDecline,
    /// Non-positive mean return, high volatility
    HighVolCrisis,
}

impl Regime {
    pub fn classify(mean_return: f64, annualized_vol: f64) -> Self {
        let high_vol = annualized_vol > VOLATILITY_CUTOFF;
        match (mean_return > 0.0, high_vol) {
            (true, false) => Regime::LowVolGrowth,
            (true, true) => Regime::HighVolGrowth,
            (false, false) => Regime::LowVolDecline,
            (false, true) => Regime::HighVolCrisis,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::LowVolGrowth => "low_vol_growth",
            Regime::HighVolGrowth => "high_vol_growth",
            Regime::LowVolDecline => "low_vol_decline",
            Regime::HighVolCrisis => "high_vol_crisis",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a regime transition; unlisted transitions are 0
pub fn transition_severity(from: Regime, to: Regime) -> f64 {
    use Regime::*;
    match (from, to) {
        (LowVolGrowth, HighVolCrisis) => 0.95,
        (LowVolDecline, HighVolCrisis) => 0.85,
        (HighVolGrowth, HighVolCrisis) => 0.8,
        (LowVolGrowth, HighVolGrowth) => 0.5,
        (HighVolGrowth, LowVolDecline) => 0.5,
        (LowVolGrowth, LowVolDecline) => 0.4,
        _ => 0.0,
    }
}

fn transition_precedent(from: Regime, to: Regime) -> Option<&'static str> {
    use Regime::*;
    match (from, to) {
        (LowVolGrowth, HighVolCrisis) => Some("2007-2008: calm expansion broke into the credit crisis"),
        (LowVolDecline, HighVolCrisis) => Some("2000-2001: slow equity decline turned disorderly"),
        (HighVolGrowth, HighVolCrisis) => Some("1987: volatile rally ended in the October crash"),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct RegimeShiftDetector {
    window: usize,
    probability_factor: f64,
    current: Option<Regime>,
    history: Vec<(Timestamp, Regime)>,
}

impl RegimeShiftDetector {
    pub fn new(window: usize, probability_factor: f64) -> Self {
        Self {
            window,
            probability_factor,
            current: None,
            history: Vec::new(),
        }
    }

    /// Most recently classified regime
    pub fn current_regime(&self) -> Option<Regime> {
        self.current
    }

    /// Every classification in call order
    pub fn history(&self) -> &[(Timestamp, Regime)] {
        &self.history
    }

    /// Classify the trailing window without touching state
    pub fn classify(&self, returns: &[f64]) -> Result<Regime> {
        let window = &returns[returns.len().saturating_sub(self.window)..];
        if window.len() < 2 {
            return Err(DetectorError::insufficient(
                NAME,
                format!("need at least 2 returns, got {}", window.len()),
            ));
        }
        let mean = stats::mean(window).unwrap_or(0.0);
        let vol = stats::annualized_volatility(window, TRADING_DAYS_PER_YEAR).unwrap_or(0.0);
        Ok(Regime::classify(mean, vol))
    }
}

impl AnomalyDetector for RegimeShiftDetector {
    type Input = [f64];

    fn detect(&mut self, returns: &[f64], at: Timestamp) -> Result<Vec<Anomaly>> {
        let regime = self.classify(returns)?;
        let previous = self.current.replace(regime);
        self.history.push((at, regime));

        let Some(previous) = previous else {
            log::debug!("[REGIME] Initial regime {}", regime);
            return Ok(Vec::new());
        };
        if previous == regime {
            return Ok(Vec::new());
        }

        let severity = transition_severity(previous, regime);
        log::info!("[REGIME] {} -> {} (severity {:.2})", previous, regime, severity);
        if severity <= 0.0 {
            return Ok(Vec::new());
        }

        let mut anomaly = Anomaly::new(
            AnomalyType::RegimeShift,
            severity,
            severity * self.probability_factor,
            at,
            format!("Regime shift from {} to {}", previous, regime),
        )
        .with_affected(["market_returns"]);
        if let Some(precedent) = transition_precedent(previous, regime) {
            anomaly = anomaly.with_precedent(precedent);
        }
        Ok(vec![anomaly])
    }

    fn name(&self) -> &str {
        NAME
    }
}
