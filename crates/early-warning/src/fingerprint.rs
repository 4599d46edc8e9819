//! Historical fingerprint matching
//!
//! Compares current readings against indicator snapshots recorded during
//! past crises. A fingerprint matches when enough of the indicators it shares
//! with the current readings sit within a relative tolerance.

use crate::config::{Catalog, Fingerprint};
use std::sync::Arc;
use vigil_core::{CrisisType, EPSILON, IndicatorReadings};

/// Matching parameters
#[derive(Debug, Clone, Copy)]
pub struct MatcherConfig {
    /// Maximum relative difference for an indicator to count as close
    pub relative_tolerance: f64,
    /// Fraction of shared indicators that must be close (strictly exceeded)
    pub min_match_fraction: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            relative_tolerance: 0.3,
            min_match_fraction: 0.6,
        }
    }
}

/// A fingerprint that matched, with its similarity
#[derive(Debug, Clone, PartialEq)]
pub struct FingerprintMatch {
    pub name: String,
    /// Fraction of shared indicators within tolerance
    pub similarity: f64,
    /// Number of indicators shared with the readings
    pub shared: usize,
}

#[derive(Debug, Clone)]
pub struct FingerprintMatcher {
    catalog: Arc<Catalog>,
    config: MatcherConfig,
}

impl FingerprintMatcher {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_config(catalog, MatcherConfig::default())
    }

    pub fn with_config(catalog: Arc<Catalog>, config: MatcherConfig) -> Self {
        Self { catalog, config }
    }

    /// Names of matching fingerprints for a crisis type, best first
    pub fn find_matches(&self, readings: &IndicatorReadings, crisis_type: CrisisType) -> Vec<String> {
        self.rank(readings, crisis_type)
            .into_iter()
            .map(|m| m.name)
            .collect()
    }

    /// Matching fingerprints with their similarity, best first.
    ///
    /// Ties keep declaration order.
    pub fn rank(
        &self,
        readings: &IndicatorReadings,
        crisis_type: CrisisType,
    ) -> Vec<FingerprintMatch> {
        let mut matches: Vec<FingerprintMatch> = self
            .catalog
            .fingerprints()
            .iter()
            .filter(|fp| fp.exemplifies(crisis_type))
            .filter_map(|fp| {
                let (similarity, shared) = self.similarity(fp, readings)?;
                (similarity > self.config.min_match_fraction).then(|| FingerprintMatch {
                    name: fp.name.clone(),
                    similarity,
                    shared,
                })
            })
            .collect();

        // sort_by is stable
        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        matches
    }

    /// Fraction of shared indicators within tolerance, and the shared count.
    ///
    /// `None` when the fingerprint and readings share no indicator.
    pub fn similarity(
        &self,
        fingerprint: &Fingerprint,
        readings: &IndicatorReadings,
    ) -> Option<(f64, usize)> {
        let mut shared = 0usize;
        let mut close = 0usize;

        for (name, &historical) in &fingerprint.values {
            let Some(&current) = readings.get(name) else {
                continue;
            };
            shared += 1;
            let relative = (current - historical).abs() / historical.abs().max(EPSILON);
            if relative < self.config.relative_tolerance {
                close += 1;
            }
        }

        (shared > 0).then(|| (close as f64 / shared as f64, shared))
    }
}
