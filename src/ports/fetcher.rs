//! Page fetcher port for HTTP page scans and existence checks.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Boxed future type alias used by [`PageFetcher`] to keep the trait dyn-compatible.
pub type FetchFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send + 'a>>;

/// A fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// Fetches pages over HTTP.
///
/// Headers and timeouts are owned by the implementation, not passed per call:
/// page fetches use the long page timeout, existence checks the short one.
pub trait PageFetcher: Send + Sync {
    /// Issues a GET and returns the body of a successful response.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] on network failure, timeout, or (for live
    /// implementations) a non-success status.
    fn fetch_page(&self, url: &str) -> FetchFuture<'_, PageResponse>;

    /// Issues a HEAD and returns the response status.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] on network failure or timeout.
    fn check_exists(&self, url: &str) -> FetchFuture<'_, u16>;
}
