//! Early Warning System
//!
//! Combines the Risk Scorer, the Fingerprint Matcher and the action tables
//! into one `EarlyWarning` per crisis type.

use crate::actions::recommended_actions;
use crate::config::Catalog;
use crate::fingerprint::FingerprintMatcher;
use crate::scorer::RiskScorer;
use std::sync::Arc;
use vigil_core::{CrisisType, EarlyWarning, IndicatorReadings, Timestamp};

/// Contributing indicators reported per warning
pub const TOP_CONTRIBUTORS: usize = 5;

#[derive(Debug, Clone)]
pub struct EarlyWarningSystem {
    scorer: RiskScorer,
    matcher: FingerprintMatcher,
}

impl EarlyWarningSystem {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            scorer: RiskScorer::new(catalog.clone()),
            matcher: FingerprintMatcher::new(catalog),
        }
    }

    pub fn with_parts(scorer: RiskScorer, matcher: FingerprintMatcher) -> Self {
        Self { scorer, matcher }
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    pub fn matcher(&self) -> &FingerprintMatcher {
        &self.matcher
    }

    /// Warning for one crisis type, or `None` when none of its indicators
    /// are present
    pub fn evaluate(
        &self,
        crisis_type: CrisisType,
        readings: &IndicatorReadings,
        materializing: bool,
        timestamp: Timestamp,
    ) -> Option<EarlyWarning> {
        let assessment = self.scorer.assess(crisis_type, readings)?;
        let level = assessment.level(materializing);

        Some(EarlyWarning {
            crisis_type,
            level,
            probability: assessment.probability,
            months_to_crisis: assessment.months_to_crisis,
            contributing_indicators: assessment.top_contributors(TOP_CONTRIBUTORS),
            confidence: assessment.confidence,
            similar_crises: self.matcher.find_matches(readings, crisis_type),
            recommended_actions: recommended_actions(crisis_type, level),
            timestamp,
        })
    }

    /// Warnings for every scorable crisis type, highest probability first
    pub fn scan(
        &self,
        readings: &IndicatorReadings,
        materializing: bool,
        timestamp: Timestamp,
    ) -> Vec<EarlyWarning> {
        let mut warnings: Vec<EarlyWarning> = self
            .scorer
            .catalog()
            .crisis_types()
            .filter_map(|crisis| self.evaluate(crisis, readings, materializing, timestamp))
            .collect();
        warnings.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_default_catalog;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use vigil_core::{AlertLevel, IndicatorDefinition};

    fn system() -> EarlyWarningSystem {
        EarlyWarningSystem::new(Arc::new(load_default_catalog().unwrap()))
    }

    fn banking_stress() -> IndicatorReadings {
        [
            ("credit_to_gdp_gap", 12.0),
            ("bank_leverage", 32.0),
            ("ted_spread", 0.85),
            ("cds_spreads_banks", 180.0),
            ("non_performing_loans", 4.5),
            ("bank_capital_ratio", 8.5),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect()
    }

    #[test]
    fn test_banking_warning_fields() {
        let warning = system()
            .evaluate(CrisisType::BankingCrisis, &banking_stress(), false, Utc::now())
            .unwrap();

        assert_eq!(warning.level, AlertLevel::Orange);
        assert!(warning.probability > 0.6);
        assert_eq!(warning.contributing_indicators.len(), TOP_CONTRIBUTORS);
        // Two indicators are red: credit gap (24m) and leverage (18m)
        assert_eq!(warning.months_to_crisis, 18);
        assert!(warning.confidence > 0.7 && warning.confidence < 0.8);
        assert_eq!(
            warning.similar_crises.first().map(String::as_str),
            Some("2008 Global Financial Crisis")
        );
        assert!(!warning.recommended_actions.is_empty());
    }

    #[test]
    fn test_materializing_promotes_red_to_black() {
        let indicators = vec![IndicatorDefinition::new("spread", 1.0, 2.0, 0.5)];
        let mut groups = BTreeMap::new();
        groups.insert(CrisisType::LiquidityCrisis, vec!["spread".to_string()]);
        let catalog = Catalog::new("t", indicators, groups, Vec::new()).unwrap();
        let sys = EarlyWarningSystem::new(Arc::new(catalog));

        let mut readings = IndicatorReadings::new();
        readings.insert("spread".into(), 2.5);

        let calm = sys
            .evaluate(CrisisType::LiquidityCrisis, &readings, false, Utc::now())
            .unwrap();
        let live = sys
            .evaluate(CrisisType::LiquidityCrisis, &readings, true, Utc::now())
            .unwrap();
        assert_eq!(calm.level, AlertLevel::Red);
        assert_eq!(live.level, AlertLevel::Black);
        assert_eq!(live.recommended_actions[0], "Activate the crisis response plan");
    }

    #[test]
    fn test_materializing_leaves_orange_alone() {
        let warning = system()
            .evaluate(CrisisType::BankingCrisis, &banking_stress(), true, Utc::now())
            .unwrap();
        assert_eq!(warning.level, AlertLevel::Orange);
    }

    #[test]
    fn test_scan_sorted_by_probability() {
        let mut readings = banking_stress();
        readings.insert("cpi_inflation".into(), 5.0);
        let warnings = system().scan(&readings, false, Utc::now());

        // Banking, housing (credit gap), liquidity (spreads), inflation
        assert_eq!(warnings.len(), 4);
        // Credit gap alone drives housing to its reliability ceiling
        assert_eq!(warnings[0].crisis_type, CrisisType::HousingBubble);
        for pair in warnings.windows(2) {
            assert!(pair[0].probability >= pair[1].probability);
        }
    }

    #[test]
    fn test_scan_skips_absent_crisis_types() {
        let mut readings = IndicatorReadings::new();
        readings.insert("cpi_inflation".into(), 3.0);
        let warnings = system().scan(&readings, false, Utc::now());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].crisis_type, CrisisType::InflationSpiral);
        assert_eq!(warnings[0].level, AlertLevel::Green);
    }
}
