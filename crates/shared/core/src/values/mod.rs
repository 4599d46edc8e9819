mod series;

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub use series::{AssetReturns, FeatureMatrix, MarketSeries, MarketSnapshot};

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Current indicator values for one scoring pass, keyed by indicator name.
///
/// Indicators absent from the map are excluded from scoring. Ordered so that
/// every pass iterates readings deterministically.
pub type IndicatorReadings = BTreeMap<String, f64>;

/// Floor applied to denominators (threshold ranges, standard deviations)
pub const EPSILON: f64 = 1e-8;
