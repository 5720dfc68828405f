//! The identity-resolution engine.
//!
//! Leaves first: `extract` pulls candidate links out of markup, `normalize`
//! canonicalizes them, `probes` turn an identity into a [`ProbeOutcome`],
//! `waterfall` runs the probes in priority order, and `batch` drives the
//! waterfall over a whole candidate list.
//!
//! [`ProbeOutcome`]: crate::model::ProbeOutcome

pub mod batch;
pub mod extract;
pub mod normalize;
pub mod probes;
pub mod waterfall;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{BatchReport, BatchRun, BatchScheduler};
pub use probes::Probes;
pub use waterfall::{WaterfallResolver, WaterfallState};
