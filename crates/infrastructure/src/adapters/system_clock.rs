//! Wall-clock time for request tokens

use chrono::{DateTime, Utc};
use replay_application::ports::Clock;

/// `Clock` reading the host's UTC time. Used by the `timestamp` token handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
