//! Indicator catalog configuration
//!
//! Thresholds, weights, crisis-type groups and the fingerprint library are
//! static configuration, loaded once and shared immutably.

mod loader;
mod types;

pub use loader::{CatalogError, load_catalog, load_catalog_from_str, load_default_catalog};
pub use types::{Catalog, CatalogFile, Fingerprint};
