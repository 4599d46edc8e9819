//! Quiet-Before-Storm Detector
//!
//! Complacency check: low implied volatility, high leverage and tight credit
//! spreads at the same time.

use crate::error::Result;
use crate::protocol::AnomalyDetector;
use serde::{Deserialize, Serialize};
use vigil_core::{Anomaly, AnomalyType, MarketSnapshot, Timestamp};

const NAME: &str = "quiet_before_storm";

/// Fixed severity of a quiet-before-storm anomaly
pub const QUIET_STORM_SEVERITY: f64 = 0.8;

/// Trigger levels; all three must hold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuietThresholds {
    /// VIX strictly below
    pub vix_below: f64,
    /// Leverage strictly above
    pub leverage_above: f64,
    /// Credit spread (bps) strictly below
    pub spread_below: f64,
}

impl Default for QuietThresholds {
    fn default() -> Self {
        Self {
            vix_below: 15.0,
            leverage_above: 20.0,
            spread_below: 100.0,
        }
    }
}

impl QuietThresholds {
    pub fn is_complacent(&self, snapshot: &MarketSnapshot) -> bool {
        snapshot.vix < self.vix_below
            && snapshot.leverage > self.leverage_above
            && snapshot.credit_spread_bps < self.spread_below
    }
}

#[derive(Debug, Clone)]
pub struct QuietBeforeStormDetector {
    thresholds: QuietThresholds,
    probability: f64,
}

impl QuietBeforeStormDetector {
    pub fn new(thresholds: QuietThresholds, probability: f64) -> Self {
        Self {
            thresholds,
            probability,
        }
    }

    pub fn thresholds(&self) -> &QuietThresholds {
        &self.thresholds
    }
}

impl AnomalyDetector for QuietBeforeStormDetector {
    type Input = MarketSnapshot;

    fn detect(&mut self, snapshot: &MarketSnapshot, at: Timestamp) -> Result<Vec<Anomaly>> {
        if !self.thresholds.is_complacent(snapshot) {
            return Ok(Vec::new());
        }
        Ok(vec![
            Anomaly::new(
                AnomalyType::QuietBeforeStorm,
                QUIET_STORM_SEVERITY,
                self.probability,
                at,
                format!(
                    "Complacency: VIX {:.1}, leverage {:.1}x, credit spread {:.0}bps, realized vol {:.1}%",
                    snapshot.vix,
                    snapshot.leverage,
                    snapshot.credit_spread_bps,
                    snapshot.realized_volatility * 100.0
                ),
            )
            .with_affected(["vix", "leverage", "credit_spread"])
            .with_precedent("2006-2007: record-low volatility ahead of the credit crisis"),
        ])
    }

    fn name(&self) -> &str {
        NAME
    }
}
