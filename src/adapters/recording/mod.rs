//! Recording adapters that capture interactions to cassettes.

pub mod aws;

pub use aws::RecordingAwsLookup;

use std::fmt::Display;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

/// Records a `Result` using the `{"ok": value}` / `{"err": message}` convention
/// that the replaying adapters read back.
pub(crate) fn record_result<T, E>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: serde_json::Value,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: Display,
{
    let output = match result {
        Ok(value) => match serde_json::to_value(value) {
            Ok(value) => serde_json::json!({ "ok": value }),
            Err(err) => {
                tracing::warn!(port, method, error = %err, "result not recordable");
                return;
            }
        },
        Err(err) => serde_json::json!({ "err": err.to_string() }),
    };
    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input, output),
        Err(_) => tracing::warn!(port, method, "recorder lock poisoned; interaction dropped"),
    }
}
