//! Live adapters for real external interactions.

pub mod clock;
pub mod fetcher;
pub mod jitter;

pub use clock::LiveClock;
pub use fetcher::LiveFetcher;
pub use jitter::SeededJitter;
