//! Vigil Core Domain
//!
//! Pure domain types for the Vigil crisis early-warning engine.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod stats;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    AlertLevel, Anomaly, AnomalyType, CrisisType, EarlyWarning, IndicatorContribution,
    IndicatorDefinition,
};
pub use values::{
    AssetReturns, EPSILON, FeatureMatrix, IndicatorReadings, MarketSeries, MarketSnapshot,
    Timestamp,
};
