//! Clock that always reports the same instant.

use chrono::{DateTime, Utc};

use crate::ports::clock::Clock;

/// Returns a fixed time on every call.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
