//! Vigil Early Warning
//!
//! Indicator-driven crisis scoring:
//! - **Catalog**: indicator thresholds, crisis-type groups, historical fingerprints
//! - **Risk Scorer**: weighted threshold interpolation into a probability per crisis type
//! - **Fingerprint Matcher**: similarity against past crisis snapshots
//! - **Early Warning System**: assembles one `EarlyWarning` per crisis type
//!
//! ## Architecture
//!
//! ```text
//! IndicatorReadings ──► RiskScorer ──────────► RiskAssessment ──┐
//!        │                                                       ▼
//!        └──────────► FingerprintMatcher ──► similar crises ──► EarlyWarning
//!                                                                ▲
//!                            recommended_actions(crisis, level) ─┘
//! ```

pub mod actions;
pub mod config;
pub mod fingerprint;
pub mod scorer;
pub mod system;

// Re-export main types
pub use actions::recommended_actions;
pub use config::{Catalog, CatalogError, Fingerprint, load_catalog, load_default_catalog};
pub use fingerprint::{FingerprintMatch, FingerprintMatcher, MatcherConfig};
pub use scorer::{RiskAssessment, RiskScorer};
pub use system::{EarlyWarningSystem, TOP_CONTRIBUTORS};
