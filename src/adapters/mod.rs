//! Port implementations.
//!
//! - `live`: real network, time, and randomness.
//! - `recording`: wraps a live port and captures every interaction to a cassette.
//! - `replaying`: serves interactions back from a cassette.

pub mod live;
pub mod recording;
pub mod replaying;
