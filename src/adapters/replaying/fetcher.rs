//! Replaying adapter for the `PageFetcher` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::fetcher::{FetchFuture, PageFetcher, PageResponse};

/// Serves recorded fetch results from a cassette, in recorded order.
pub struct ReplayingFetcher {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFetcher {
    /// Creates a replaying fetcher from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl PageFetcher for ReplayingFetcher {
    fn fetch_page(&self, url: &str) -> FetchFuture<'_, PageResponse> {
        let output = next_output(&self.replayer, "fetcher", "fetch_page", url);
        Box::pin(async move { output.and_then(|o| replay_result(o, "fetch_page")) })
    }

    fn check_exists(&self, url: &str) -> FetchFuture<'_, u16> {
        let output = next_output(&self.replayer, "fetcher", "check_exists", url);
        Box::pin(async move { output.and_then(|o| replay_result(o, "check_exists")) })
    }
}
