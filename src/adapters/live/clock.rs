//! Wall clock used to stamp `meta.start_time`.

use chrono::{DateTime, Utc};

use crate::ports::clock::Clock;

/// Reads the system clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
