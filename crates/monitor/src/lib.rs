//! Vigil Crisis Monitor
//!
//! Alert aggregation over the early-warning and anomaly engines:
//! - **CrisisMonitor**: scheduled or forced passes, merged and ranked alerts,
//!   highest-severity tracking, bounded history and summaries
//! - **MonitorService**: async polling loop feeding the monitor from a
//!   `ReadingsSource` and broadcasting results
//!
//! ## Architecture
//!
//! ```text
//!                 ┌──────────────────────────────┐
//!  Readings ─────►│ EarlyWarningSystem (thread)  │──┐
//!                 └──────────────────────────────┘  │
//!                 ┌──────────────────────────────┐  ├─► AggregationResult ─► history
//!  Series ───────►│ AnomalyEnsemble              │──┘          │
//!                 └──────────────────────────────┘             ▼
//!                                                        summary / broadcast
//! ```

pub mod config;
pub mod error;
pub mod monitor;
pub mod result;
pub mod service;

// Re-export main types
pub use config::{MonitorConfig, load_config, load_config_from_str};
pub use error::{MonitorError, Result};
pub use monitor::CrisisMonitor;
pub use result::{AggregationResult, AlertEntry, EntrySource};
pub use service::{MonitorCommand, MonitorHandle, MonitorService};
pub use vigil_anomaly::DetectorFailure;
