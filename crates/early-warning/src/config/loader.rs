use std::path::Path;
use thiserror::Error;

use super::types::{Catalog, CatalogFile};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid indicator {name}: {reason}")]
    InvalidIndicator { name: String, reason: String },
    #[error("Duplicate indicator: {0}")]
    DuplicateIndicator(String),
    #[error("{context} references unknown indicator {indicator}")]
    UnknownIndicator { context: String, indicator: String },
}

/// Load an indicator catalog from a JSON file
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, CatalogError> {
    let content = std::fs::read_to_string(path)?;
    load_catalog_from_str(&content)
}

/// Load an indicator catalog from a JSON string
pub fn load_catalog_from_str(json: &str) -> Result<Catalog, CatalogError> {
    let file: CatalogFile = serde_json::from_str(json)?;
    let catalog = Catalog::try_from(file).inspect_err(|e| {
        log::error!("[CATALOG] Rejected catalog: {}", e);
    })?;
    log::info!(
        "[CATALOG] Loaded version {} ({} indicators, {} fingerprints)",
        catalog.version(),
        catalog.indicators().len(),
        catalog.fingerprints().len()
    );
    Ok(catalog)
}

/// Load the default embedded catalog
pub fn load_default_catalog() -> Result<Catalog, CatalogError> {
    let default_catalog = include_str!("default_catalog.json");
    load_catalog_from_str(default_catalog)
}
