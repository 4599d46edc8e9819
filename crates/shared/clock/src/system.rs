use chrono::Utc;
use vigil_core::Timestamp;
use vigil_ports::Clock;

/// Wall-clock time, used by `CrisisMonitor::system`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "system"
    }
}
