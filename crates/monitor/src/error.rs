//! Monitor errors

use thiserror::Error;
use vigil_anomaly::DetectorError;
use vigil_early_warning::CatalogError;
use vigil_ports::SourceError;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Catalog error: {0}")]
    Config(#[from] CatalogError),

    #[error("Invalid monitor configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Detector setup failed: {0}")]
    Detector(#[from] DetectorError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Monitor service stopped")]
    ServiceStopped,
}

pub type Result<T> = std::result::Result<T, MonitorError>;
