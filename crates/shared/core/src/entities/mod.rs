mod alert_level;
mod anomaly;
mod crisis_type;
mod early_warning;
mod indicator;

pub use alert_level::AlertLevel;
pub use anomaly::{Anomaly, AnomalyType};
pub use crisis_type::CrisisType;
pub use early_warning::{EarlyWarning, IndicatorContribution};
pub use indicator::IndicatorDefinition;
