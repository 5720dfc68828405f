//! Clock port for obtaining the current time and waiting.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Boxed future returned by [`Clock::sleep`], keeping the trait dyn-compatible.
pub type SleepFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Provides the current time and suspends execution.
///
/// Abstracting time lets tests drive the batch delay with a virtual clock
/// instead of waiting in real time.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;

    /// Suspends the caller for the given duration.
    fn sleep(&self, duration: Duration) -> SleepFuture<'_>;
}
