//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the resolution engine and an
//! external system (the web, time, randomness, progress reporting).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod fetcher;
pub mod jitter;
pub mod progress;

pub use clock::{Clock, SleepFuture};
pub use fetcher::{FetchFuture, PageFetcher, PageResponse};
pub use jitter::JitterSource;
pub use progress::ProgressObserver;
