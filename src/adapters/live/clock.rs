//! Live clock using the system clock and the tokio timer.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::ports::clock::{Clock, SleepFuture};

/// Live clock that returns the real current time and really waits.
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
        Box::pin(tokio::time::sleep(duration))
    }
}
