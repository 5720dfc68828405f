//! Recording adapters that capture interactions to cassettes.

pub mod fetcher;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

pub use fetcher::RecordingFetcher;

/// Record a `Result<T, E>` interaction using the ok/err JSON convention.
///
/// Mirror of `replaying::replay_result`:
/// - `Ok(v)` is serialized as `{"ok": v}`
/// - `Err(e)` is serialized as `{"err": e}`
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: Serialize,
    I: Serialize,
{
    let input_json = serde_json::to_value(input).unwrap_or(serde_json::Value::Null);

    let output_json = match result {
        Ok(v) => serde_json::json!({ "ok": v }),
        Err(e) => serde_json::json!({ "err": e }),
    };

    let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
    guard.record(port, method, input_json, output_json);
}
