//! Anomaly Detection Protocol
//!
//! Every detector consumes its own input shape and yields zero or more
//! anomalies, or an error the ensemble reports without aborting the pass.

use crate::error::Result;
use vigil_core::{Anomaly, Timestamp};

/// Anomaly detector interface.
///
/// Only a detector's own fit/baseline/detect calls touch its internal state.
pub trait AnomalyDetector: Send + Sync {
    /// Input shape this detector consumes
    type Input: ?Sized;

    /// Run detection against `input`, stamping anomalies with `at`
    fn detect(&mut self, input: &Self::Input, at: Timestamp) -> Result<Vec<Anomaly>>;

    /// Whether the detector has what it needs to run (fit, baseline)
    fn is_ready(&self) -> bool {
        true
    }

    /// Detector name for logging and failure reports
    fn name(&self) -> &str;
}
