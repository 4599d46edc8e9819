//! Risk Scorer
//!
//! Converts indicator readings into a crisis probability per crisis type
//! using reliability- and weight-adjusted threshold interpolation.

use crate::config::Catalog;
use std::sync::Arc;
use vigil_core::{AlertLevel, CrisisType, IndicatorContribution, IndicatorReadings};

/// Scored view of one crisis type for one pass
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    pub crisis_type: CrisisType,
    /// Weighted probability in [0, 1]
    pub probability: f64,
    /// Every relevant indicator that was present, in group order
    pub contributions: Vec<IndicatorContribution>,
    /// Mean reliability of the contributing indicators
    pub confidence: f64,
    /// Lead-time estimate in months (>= 1)
    pub months_to_crisis: u32,
}

impl RiskAssessment {
    /// Alert level for this assessment
    pub fn level(&self, materializing: bool) -> AlertLevel {
        AlertLevel::from_probability(self.probability, materializing)
    }

    /// Contributions with the largest |z-score|, at most `n`
    pub fn top_contributors(&self, n: usize) -> Vec<IndicatorContribution> {
        let mut ranked = self.contributions.clone();
        ranked.sort_by(|a, b| b.z_score.abs().total_cmp(&a.z_score.abs()));
        ranked.truncate(n);
        ranked
    }
}

/// Weighted threshold scorer over an immutable catalog
#[derive(Debug, Clone)]
pub struct RiskScorer {
    catalog: Arc<Catalog>,
}

impl RiskScorer {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Crisis probability in [0, 1]; 0 when no relevant indicator is present
    pub fn score(&self, crisis_type: CrisisType, readings: &IndicatorReadings) -> f64 {
        self.assess(crisis_type, readings)
            .map(|a| a.probability)
            .unwrap_or(0.0)
    }

    /// Full assessment, or `None` when no relevant indicator carries weight.
    ///
    /// Missing indicators are skipped and only reduce the weight total.
    pub fn assess(
        &self,
        crisis_type: CrisisType,
        readings: &IndicatorReadings,
    ) -> Option<RiskAssessment> {
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        let mut reliability_sum = 0.0;
        let mut contributions = Vec::new();
        let mut min_red_lead: Option<u32> = None;
        let mut max_lead: u32 = 0;

        for def in self.catalog.relevant(crisis_type) {
            let Some(&value) = readings.get(&def.name) else {
                continue;
            };
            if !value.is_finite() {
                log::debug!("[SCORER] Skipping non-finite {} = {}", def.name, value);
                continue;
            }

            let score = def.threshold_score(value);
            weighted_sum += score * def.reliability * def.weight;
            weight_total += def.weight;
            reliability_sum += def.reliability;

            if def.is_red(value) {
                min_red_lead = Some(
                    min_red_lead.map_or(def.lead_time_months, |m| m.min(def.lead_time_months)),
                );
            }
            max_lead = max_lead.max(def.lead_time_months);

            contributions.push(IndicatorContribution {
                name: def.name.clone(),
                value,
                z_score: def.z_score(value),
                score,
            });
        }

        if weight_total <= 0.0 {
            return None;
        }

        let probability = (weighted_sum / weight_total).clamp(0.0, 1.0);
        let confidence = reliability_sum / contributions.len() as f64;
        let months_to_crisis = min_red_lead.unwrap_or(max_lead).max(1);

        Some(RiskAssessment {
            crisis_type,
            probability,
            contributions,
            confidence,
            months_to_crisis,
        })
    }

    /// Assess every crisis type that has at least one indicator present
    pub fn assess_all(&self, readings: &IndicatorReadings) -> Vec<RiskAssessment> {
        self.catalog
            .crisis_types()
            .filter_map(|crisis| self.assess(crisis, readings))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Catalog, load_default_catalog};
    use approx::assert_abs_diff_eq;
    use std::collections::BTreeMap;
    use vigil_core::IndicatorDefinition;

    fn default_scorer() -> RiskScorer {
        RiskScorer::new(Arc::new(load_default_catalog().unwrap()))
    }

    fn readings(pairs: &[(&str, f64)]) -> IndicatorReadings {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn stressed_banking() -> IndicatorReadings {
        readings(&[
            ("credit_to_gdp_gap", 12.0),
            ("bank_leverage", 32.0),
            ("ted_spread", 0.85),
            ("cds_spreads_banks", 180.0),
            ("non_performing_loans", 4.5),
            ("bank_capital_ratio", 8.5),
        ])
    }

    /// Two-indicator catalog with unit reliabilities for exact arithmetic
    fn small_scorer() -> RiskScorer {
        let indicators = vec![
            IndicatorDefinition::new("a", 0.0, 10.0, -5.0)
                .with_lead_time(6)
                .with_weight(1.0),
            IndicatorDefinition::new("b", 10.0, 0.0, 20.0)
                .inverted()
                .with_lead_time(18)
                .with_weight(3.0),
        ];
        let mut groups = BTreeMap::new();
        groups.insert(CrisisType::Recession, vec!["a".to_string(), "b".to_string()]);
        RiskScorer::new(Arc::new(
            Catalog::new("test", indicators, groups, Vec::new()).unwrap(),
        ))
    }

    #[test]
    fn test_stressed_banking_is_orange_or_worse() {
        let scorer = default_scorer();
        let assessment = scorer
            .assess(CrisisType::BankingCrisis, &stressed_banking())
            .unwrap();
        assert!(assessment.probability > 0.6, "{}", assessment.probability);
        assert!(assessment.level(false) >= AlertLevel::Orange);
    }

    #[test]
    fn test_historical_averages_are_green() {
        let scorer = default_scorer();
        let averages = scorer.catalog().historical_averages();
        for crisis in CrisisType::ALL {
            let assessment = scorer.assess(crisis, &averages).unwrap();
            assert!(assessment.probability < 0.2);
            assert_eq!(assessment.level(false), AlertLevel::Green);
        }
    }

    #[test]
    fn test_empty_readings_score_zero() {
        let scorer = default_scorer();
        let empty = IndicatorReadings::new();
        for crisis in CrisisType::ALL {
            assert_eq!(scorer.score(crisis, &empty), 0.0);
            assert!(scorer.assess(crisis, &empty).is_none());
        }
        assert!(scorer.assess_all(&empty).is_empty());
    }

    #[test]
    fn test_weighted_average_arithmetic() {
        let scorer = small_scorer();
        // a: 5 -> 0.5 (weight 1); b: 5 inverted -> 0.5 (weight 3)
        let r = readings(&[("a", 5.0), ("b", 5.0)]);
        assert_abs_diff_eq!(scorer.score(CrisisType::Recession, &r), 0.5, epsilon = 1e-12);

        // a red (1.0 * 1), b safe (0.0 * 3) -> 1/4
        let r = readings(&[("a", 12.0), ("b", 15.0)]);
        assert_abs_diff_eq!(scorer.score(CrisisType::Recession, &r), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_indicator_reduces_weight_total() {
        let scorer = small_scorer();
        let r = readings(&[("a", 12.0)]);
        assert_abs_diff_eq!(scorer.score(CrisisType::Recession, &r), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reliability_discounts_score() {
        let indicators = vec![
            IndicatorDefinition::new("a", 0.0, 1.0, -1.0).with_reliability(0.5),
        ];
        let mut groups = BTreeMap::new();
        groups.insert(CrisisType::MarketCrash, vec!["a".to_string()]);
        let scorer = RiskScorer::new(Arc::new(
            Catalog::new("t", indicators, groups, Vec::new()).unwrap(),
        ));
        let r = readings(&[("a", 2.0)]);
        assert_abs_diff_eq!(scorer.score(CrisisType::MarketCrash, &r), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_lead_time_uses_min_red() {
        let scorer = small_scorer();
        // Both red: min(6, 18)
        let r = readings(&[("a", 12.0), ("b", -1.0)]);
        let a = scorer.assess(CrisisType::Recession, &r).unwrap();
        assert_eq!(a.months_to_crisis, 6);

        // Only b red
        let r = readings(&[("a", 5.0), ("b", -1.0)]);
        let a = scorer.assess(CrisisType::Recession, &r).unwrap();
        assert_eq!(a.months_to_crisis, 18);
    }

    #[test]
    fn test_lead_time_falls_back_to_max() {
        let scorer = small_scorer();
        let r = readings(&[("a", 5.0), ("b", 5.0)]);
        let a = scorer.assess(CrisisType::Recession, &r).unwrap();
        assert_eq!(a.months_to_crisis, 18);
    }

    #[test]
    fn test_probability_bounded_for_extremes() {
        let scorer = default_scorer();
        for value in [-1e12, -1.0, 0.0, 1.0, 1e12] {
            let r: IndicatorReadings = scorer
                .catalog()
                .indicators()
                .iter()
                .map(|d| (d.name.clone(), value))
                .collect();
            for crisis in CrisisType::ALL {
                let p = scorer.score(crisis, &r);
                assert!((0.0..=1.0).contains(&p));
            }
        }
    }

    #[test]
    fn test_top_contributors_by_abs_z() {
        let scorer = default_scorer();
        let a = scorer
            .assess(CrisisType::BankingCrisis, &stressed_banking())
            .unwrap();
        assert_eq!(a.contributions.len(), 6);
        let top = a.top_contributors(5);
        assert_eq!(top.len(), 5);
        for pair in top.windows(2) {
            assert!(pair[0].z_score.abs() >= pair[1].z_score.abs());
        }
    }

    #[test]
    fn test_confidence_is_mean_reliability() {
        let scorer = default_scorer();
        let r = readings(&[("ted_spread", 0.4), ("bank_leverage", 15.0)]);
        let a = scorer.assess(CrisisType::BankingCrisis, &r).unwrap();
        assert_abs_diff_eq!(a.confidence, (0.8 + 0.75) / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unrelated_readings_are_ignored() {
        let scorer = default_scorer();
        let r = readings(&[("gdp_growth", -2.0)]);
        assert!(scorer.assess(CrisisType::BankingCrisis, &r).is_none());
    }
}
