//! The `HistoryStore` and `CredentialStore` traits.
//!
//! Implemented by storage backends (e.g. `verity-store-sqlite`). The
//! orchestrator in `verity-client` depends on these abstractions, not on
//! any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::record::{FactCheckRecord, NewFactCheck};

/// Fixed storage key for the serialised history collection.
pub const HISTORY_KEY: &str = "factcheck-history";

/// Fixed storage key for the persisted API credential.
pub const API_KEY_KEY: &str = "factcheck-api-key";

/// A bounded, most-recent-first collection of fact-check records.
///
/// Records are never updated. Inserting beyond
/// [`HISTORY_LIMIT`](crate::record::HISTORY_LIMIT) evicts the oldest.
pub trait HistoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Assign an id and timestamp, prepend, truncate, persist, and return the
  /// stored record.
  fn save(
    &self,
    input: NewFactCheck,
  ) -> impl Future<Output = Result<FactCheckRecord, Self::Error>> + Send + '_;

  /// All records, most recent first. Unreadable persisted data lists as
  /// empty rather than failing.
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<FactCheckRecord>, Self::Error>> + Send + '_;

  /// Remove the record with `id`. Absent ids are not an error.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove every record.
  fn clear(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// Persistence for the upstream API credential.
pub trait CredentialStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn load_api_key(
    &self,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  fn save_api_key(
    &self,
    key: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn clear_api_key(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
