//! Vigil Anomaly Detection
//!
//! Five independent statistical detectors and the ensemble that runs them:
//! - **Outlier**: per-feature z-score against a fitted normal sample
//! - **Pattern**: reconstruction error through a fixed seeded projection
//! - **Regime Shift**: transitions between return/volatility regimes
//! - **Correlation Breakdown**: departures from a baseline correlation matrix
//! - **Quiet Before Storm**: low volatility with high leverage and tight spreads
//!
//! Detector failures are reported per detector; one failing detector never
//! stops the others.

pub mod config;
pub mod correlation;
pub mod ensemble;
pub mod error;
pub mod outlier;
pub mod pattern;
pub mod protocol;
pub mod quiet;
pub mod regime;

// Re-export main types
pub use config::{AnomalyCalibration, EnsembleConfig};
pub use correlation::CorrelationBreakdownDetector;
pub use ensemble::{AnomalyEnsemble, DetectorFailure, EnsembleReport};
pub use error::{DetectorError, Result};
pub use outlier::OutlierDetector;
pub use pattern::PatternDetector;
pub use protocol::AnomalyDetector;
pub use quiet::{QuietBeforeStormDetector, QuietThresholds};
pub use regime::{Regime, RegimeShiftDetector};
