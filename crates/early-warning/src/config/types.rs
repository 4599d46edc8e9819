use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use vigil_core::{CrisisType, IndicatorDefinition};

use super::loader::CatalogError;

/// Indicator snapshot recorded during a past, confirmed crisis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub name: String,
    /// Crisis types this episode exemplifies
    pub crisis_types: Vec<CrisisType>,
    pub values: BTreeMap<String, f64>,
}

impl Fingerprint {
    pub fn exemplifies(&self, crisis_type: CrisisType) -> bool {
        self.crisis_types.contains(&crisis_type)
    }
}

/// On-disk catalog layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub version: String,
    pub indicators: Vec<IndicatorDefinition>,
    /// Indicator names relevant to each crisis type (sets may overlap)
    pub groups: BTreeMap<CrisisType, Vec<String>>,
    #[serde(default)]
    pub fingerprints: Vec<Fingerprint>,
}

/// Validated, immutable indicator catalog and fingerprint library.
///
/// Shared by the scorer and the matcher behind an `Arc`; never mutated
/// after construction.
#[derive(Debug, Clone)]
pub struct Catalog {
    version: String,
    indicators: Vec<IndicatorDefinition>,
    index: HashMap<String, usize>,
    groups: BTreeMap<CrisisType, Vec<String>>,
    fingerprints: Vec<Fingerprint>,
}

impl Catalog {
    /// Build and validate a catalog
    pub fn new(
        version: impl Into<String>,
        indicators: Vec<IndicatorDefinition>,
        groups: BTreeMap<CrisisType, Vec<String>>,
        fingerprints: Vec<Fingerprint>,
    ) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(indicators.len());
        for (i, def) in indicators.iter().enumerate() {
            validate_indicator(def)?;
            if index.insert(def.name.clone(), i).is_some() {
                return Err(CatalogError::DuplicateIndicator(def.name.clone()));
            }
        }

        for (crisis, members) in &groups {
            for name in members {
                if !index.contains_key(name) {
                    return Err(CatalogError::UnknownIndicator {
                        context: crisis.as_str().to_string(),
                        indicator: name.clone(),
                    });
                }
            }
        }

        for fingerprint in &fingerprints {
            if let Some(name) = fingerprint.values.keys().find(|n| !index.contains_key(*n)) {
                return Err(CatalogError::UnknownIndicator {
                    context: fingerprint.name.clone(),
                    indicator: name.clone(),
                });
            }
        }

        Ok(Self {
            version: version.into(),
            indicators,
            index,
            groups,
            fingerprints,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Look up an indicator definition by name
    pub fn indicator(&self, name: &str) -> Option<&IndicatorDefinition> {
        self.index.get(name).map(|&i| &self.indicators[i])
    }

    pub fn indicators(&self) -> &[IndicatorDefinition] {
        &self.indicators
    }

    /// Indicators relevant to a crisis type, in group order
    pub fn relevant(&self, crisis_type: CrisisType) -> impl Iterator<Item = &IndicatorDefinition> {
        self.groups
            .get(&crisis_type)
            .into_iter()
            .flatten()
            .filter_map(|name| self.indicator(name))
    }

    /// Crisis types that declare at least one indicator
    pub fn crisis_types(&self) -> impl Iterator<Item = CrisisType> + '_ {
        self.groups
            .iter()
            .filter(|(_, members)| !members.is_empty())
            .map(|(crisis, _)| *crisis)
    }

    /// Fingerprints in declaration order
    pub fn fingerprints(&self) -> &[Fingerprint] {
        &self.fingerprints
    }

    /// Historical averages of every indicator, as a reading set
    pub fn historical_averages(&self) -> vigil_core::IndicatorReadings {
        self.indicators
            .iter()
            .map(|def| (def.name.clone(), def.historical_average))
            .collect()
    }
}

impl TryFrom<CatalogFile> for Catalog {
    type Error = CatalogError;

    fn try_from(file: CatalogFile) -> Result<Self, Self::Error> {
        Catalog::new(file.version, file.indicators, file.groups, file.fingerprints)
    }
}

fn validate_indicator(def: &IndicatorDefinition) -> Result<(), CatalogError> {
    let invalid = |reason: &str| CatalogError::InvalidIndicator {
        name: def.name.clone(),
        reason: reason.to_string(),
    };

    if def.name.is_empty() {
        return Err(invalid("empty name"));
    }
    if !def.yellow.is_finite() || !def.red.is_finite() || !def.historical_average.is_finite() {
        return Err(invalid("thresholds must be finite"));
    }
    if !(0.0..=1.0).contains(&def.reliability) {
        return Err(invalid("reliability must be within [0, 1]"));
    }
    if !def.weight.is_finite() || def.weight < 0.0 {
        return Err(invalid("weight must be non-negative"));
    }
    if def.lead_time_months == 0 {
        return Err(invalid("lead time must be at least one month"));
    }
    // Equal thresholds are allowed; scoring substitutes an epsilon range
    if def.inverted && def.red > def.yellow {
        return Err(invalid("inverted indicator needs red <= yellow"));
    }
    if !def.inverted && def.red < def.yellow {
        return Err(invalid("red threshold below yellow"));
    }
    Ok(())
}
