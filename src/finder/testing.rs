//! Test doubles for the fetcher, clock, and jitter ports.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use crate::error::FetchError;
use crate::ports::{Clock, FetchFuture, JitterSource, PageFetcher, PageResponse, SleepFuture};

/// Fetcher answering from URL-keyed scripts and logging every request.
///
/// Unscripted pages fail with HTTP 404; unscripted existence checks answer 404.
#[derive(Default)]
pub(crate) struct ScriptedFetcher {
    pages: HashMap<String, Result<PageResponse, FetchError>>,
    statuses: HashMap<String, Result<u16, FetchError>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(mut self, url: &str, body: &str) -> Self {
        self.pages
            .insert(url.to_string(), Ok(PageResponse { status: 200, body: body.to_string() }));
        self
    }

    pub(crate) fn page_error(mut self, url: &str, err: FetchError) -> Self {
        self.pages.insert(url.to_string(), Err(err));
        self
    }

    pub(crate) fn status(mut self, url: &str, status: u16) -> Self {
        self.statuses.insert(url.to_string(), Ok(status));
        self
    }

    pub(crate) fn status_error(mut self, url: &str, err: FetchError) -> Self {
        self.statuses.insert(url.to_string(), Err(err));
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl PageFetcher for ScriptedFetcher {
    fn fetch_page(&self, url: &str) -> FetchFuture<'_, PageResponse> {
        self.requests.lock().unwrap().push(url.to_string());
        let result = self
            .pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Status { url: url.to_string(), status: 404 }));
        Box::pin(async move { result })
    }

    fn check_exists(&self, url: &str) -> FetchFuture<'_, u16> {
        self.requests.lock().unwrap().push(url.to_string());
        let result = self.statuses.get(url).cloned().unwrap_or(Ok(404));
        Box::pin(async move { result })
    }
}

/// Virtual clock: `sleep` returns immediately and advances `now`.
pub(crate) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub(crate) fn new() -> Self {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Self { now: Mutex::new(start), sleeps: Mutex::new(Vec::new()) }
    }

    pub(crate) fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
        self.sleeps.lock().unwrap().push(duration);
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(duration).unwrap();
        Box::pin(async {})
    }
}

/// Jitter source returning the same value every time.
pub(crate) struct FixedJitter(pub(crate) u64);

impl JitterSource for FixedJitter {
    fn jitter_ms(&self, ceiling_ms: u64) -> u64 {
        self.0.min(ceiling_ms.saturating_sub(1))
    }
}
