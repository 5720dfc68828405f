//! Error types for fetching, extraction, probing, and the application surface.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A network-level failure on a page fetch or existence check.
///
/// Serializable so that recorded failures replay as the same variant.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchError {
    /// The request did not complete within its timeout.
    #[error("request to {url} timed out")]
    Timeout {
        /// The requested URL.
        url: String,
    },
    /// The request could not be sent or its body could not be read.
    #[error("request to {url} failed: {message}")]
    Network {
        /// The requested URL.
        url: String,
        /// Transport-level error description.
        message: String,
    },
    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },
}

impl FetchError {
    /// Classifies a reqwest error against the URL it was issued for.
    pub(crate) fn from_reqwest(url: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { url: url.to_string() }
        } else if let Some(status) = err.status() {
            Self::Status { url: url.to_string(), status: status.as_u16() }
        } else {
            Self::Network { url: url.to_string(), message: err.to_string() }
        }
    }
}

/// Malformed markup or structured data encountered during extraction.
///
/// Never escapes the extractor: the offending block is skipped and logged.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A structured-data (JSON-LD) block did not parse as JSON.
    #[error("structured data block is not valid JSON: {0}")]
    StructuredData(#[from] serde_json::Error),
}

/// A failure that aborts a single probe.
///
/// The waterfall records it in the attempts log and moves to the next probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A fetch failed in a probe that does not recover from fetch failures.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Application-level errors that abort a whole run.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error("{context}: {source}")]
    Io {
        /// What was being done.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// JSON input or output was malformed.
    #[error("{context}: {source}")]
    Json {
        /// What was being parsed or written.
        context: String,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },
    /// A cassette file was unreadable or malformed.
    #[error("cassette error: {0}")]
    Cassette(String),
    /// Configuration or required input was missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Wraps an I/O error with a description of the failed operation.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Wraps a serde error with a description of the failed operation.
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json { context: context.into(), source }
    }
}
