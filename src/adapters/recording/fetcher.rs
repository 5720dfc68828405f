//! Recording adapter for the `PageFetcher` port.

use std::sync::{Arc, Mutex};

use serde_json::json;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::fetcher::{FetchFuture, PageFetcher, PageResponse};

/// Records fetcher interactions while delegating to an inner implementation.
pub struct RecordingFetcher {
    inner: Box<dyn PageFetcher>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingFetcher {
    /// Creates a new recording fetcher wrapping the given implementation.
    pub fn new(inner: Box<dyn PageFetcher>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl PageFetcher for RecordingFetcher {
    fn fetch_page(&self, url: &str) -> FetchFuture<'_, PageResponse> {
        let url = url.to_string();

        Box::pin(async move {
            let result = self.inner.fetch_page(&url).await;
            record_result(&self.recorder, "fetcher", "fetch_page", &json!({ "url": url }), &result);
            result
        })
    }

    fn check_exists(&self, url: &str) -> FetchFuture<'_, u16> {
        let url = url.to_string();

        Box::pin(async move {
            let result = self.inner.check_exists(&url).await;
            record_result(
                &self.recorder,
                "fetcher",
                "check_exists",
                &json!({ "url": url }),
                &result,
            );
            result
        })
    }
}
