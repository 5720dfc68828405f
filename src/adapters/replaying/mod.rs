//! Replaying adapters that replay recorded interactions.

pub mod fetcher;

use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::FetchError;

pub use fetcher::ReplayingFetcher;

/// Take the next recorded output for a port/method pair.
///
/// An exhausted cassette is reported as a network failure so a short
/// recording degrades into probe misses instead of aborting the run.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
    url: &str,
) -> Result<serde_json::Value, FetchError> {
    let mut guard = replayer.lock().unwrap_or_else(PoisonError::into_inner);
    guard
        .next_interaction(port, method)
        .map(|interaction| interaction.output)
        .map_err(|message| FetchError::Network { url: url.to_string(), message })
}

/// Decode an output written by `recording::record_result`.
///
/// A cassette entry that matches neither shape is reported as a network
/// failure naming the offending method.
pub(crate) fn replay_result<T>(output: serde_json::Value, method: &str) -> Result<T, FetchError>
where
    T: DeserializeOwned,
{
    let malformed = |detail: String| FetchError::Network {
        url: String::new(),
        message: format!("malformed cassette entry for {method}: {detail}"),
    };

    if let Some(ok) = output.get("ok") {
        return serde_json::from_value(ok.clone()).map_err(|e| malformed(e.to_string()));
    }
    if let Some(err) = output.get("err") {
        let err: FetchError =
            serde_json::from_value(err.clone()).map_err(|e| malformed(e.to_string()))?;
        return Err(err);
    }
    Err(malformed(output.to_string()))
}
