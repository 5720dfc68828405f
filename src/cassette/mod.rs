//! Cassette format for recording and replaying fetcher interactions.

pub mod format;
pub mod recorder;
pub mod replayer;
