//! Detector errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectorError {
    #[error("{detector} used before fit")]
    NotFitted { detector: String },

    #[error("{detector} has insufficient data: {reason}")]
    InsufficientData { detector: String, reason: String },

    #[error("Dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Asset set differs from baseline: {0}")]
    AssetMismatch(String),
}

impl DetectorError {
    pub fn not_fitted(detector: &str) -> Self {
        Self::NotFitted {
            detector: detector.to_string(),
        }
    }

    pub fn insufficient(detector: &str, reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            detector: detector.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DetectorError>;
