//! Vigil Ports
//!
//! Port definitions (traits) for the Vigil engine.
//! These define the boundaries between domain logic and infrastructure.

mod clock;
mod error;
mod source;

pub use clock::Clock;
pub use error::{SourceError, SourceResult};
pub use source::{Observation, ReadingsSource};
