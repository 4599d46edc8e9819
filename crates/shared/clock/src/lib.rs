//! Vigil Clock Infrastructure
//!
//! Time sources for the monitor's polling schedule:
//!
//! - [`SystemClock`]: wall-clock time for production
//! - [`ManualClock`]: frozen time that moves only when advanced
//!
//! ## Usage
//!
//! ```ignore
//! use vigil_clock::ManualClock;
//! use chrono::Duration;
//!
//! let clock = ManualClock::new(None);
//! clock.advance(Duration::hours(1)); // next poll becomes due
//! ```

mod manual;
mod system;

pub use manual::ManualClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use vigil_ports::Clock;
