use vigil_core::Timestamp;

/// Time source for the monitor's polling schedule.
///
/// Every `AggregationResult` is stamped with `now()`, and a check falls due
/// once `now()` reaches the last check plus the poll interval. Passing a
/// manually driven clock makes that schedule reproducible.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Shown in monitor start-up logs
    fn name(&self) -> &str {
        "clock"
    }
}
