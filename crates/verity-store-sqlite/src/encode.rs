//! Conversion between the history collection and its stored JSON blob.

use verity_core::record::{decode_history, encode_history, FactCheckRecord};

/// Decode a stored blob. A missing row is an empty history; so is a blob
/// that no longer parses, which is logged and otherwise ignored.
pub fn history_from_blob(raw: Option<String>) -> Vec<FactCheckRecord> {
  let Some(raw) = raw else {
    return Vec::new();
  };
  match decode_history(&raw) {
    Ok(history) => history,
    Err(e) => {
      tracing::warn!(error = %e, "stored history is unreadable; treating it as empty");
      Vec::new()
    }
  }
}

pub fn history_to_blob(history: &[FactCheckRecord]) -> tokio_rusqlite::Result<String> {
  encode_history(history).map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))
}
