//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod filesystem;

pub use clock::ReplayingClock;
pub use filesystem::ReplayingFileSystem;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;

/// Pull the next recorded interaction for `port::method`, returning its
/// `(input, output)` pair.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> (serde_json::Value, serde_json::Value) {
    let mut replayer = replayer.lock().expect("replayer lock poisoned");
    let interaction = replayer.next_interaction(port, method);
    (interaction.input.clone(), interaction.output.clone())
}

/// Decode a recorded `Result` using the `{"ok": v}` / `{"err": msg}` convention.
///
/// Mirror of `recording::record_result`.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: &serde_json::Value,
    context: &str,
) -> Result<T, PortError> {
    if let Some(err) = output.get("err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("ok").unwrap_or(output);
    serde_json::from_value(value.clone())
        .map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}
