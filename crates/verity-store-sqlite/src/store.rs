//! [`SqliteStore`] — the SQLite implementation of [`HistoryStore`] and
//! [`CredentialStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use verity_core::{
  record::{FactCheckRecord, NewFactCheck, HISTORY_LIMIT},
  store::{CredentialStore, HistoryStore, API_KEY_KEY, HISTORY_KEY},
};

use crate::{
  encode::{history_from_blob, history_to_blob},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Verity store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  /// Missing parent directories are created.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_value(&self, key: &'static str) -> Result<Option<String>> {
    let value = self
      .conn
      .call(move |conn| Ok(read_value(conn, key)?))
      .await?;
    Ok(value)
  }

  async fn remove_value(&self, key: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM local_storage WHERE key = ?1",
          rusqlite::params![key],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row helpers ─────────────────────────────────────────────────────────────

fn read_value(conn: &rusqlite::Connection, key: &str) -> rusqlite::Result<Option<String>> {
  conn
    .query_row(
      "SELECT value FROM local_storage WHERE key = ?1",
      rusqlite::params![key],
      |row| row.get(0),
    )
    .optional()
}

fn write_value(conn: &rusqlite::Connection, key: &str, value: &str) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    rusqlite::params![key, value],
  )?;
  Ok(())
}

// ─── HistoryStore impl ───────────────────────────────────────────────────────

impl HistoryStore for SqliteStore {
  type Error = Error;

  async fn save(&self, input: NewFactCheck) -> Result<FactCheckRecord> {
    let record = input.into_record(Uuid::new_v4(), Utc::now());
    let entry = record.clone();

    // Read-modify-write in one transaction so the eviction sees the
    // collection it is about to overwrite.
    let (len, evicted) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut history = history_from_blob(read_value(&tx, HISTORY_KEY)?);
        history.insert(0, entry);
        let evicted = history.len().saturating_sub(HISTORY_LIMIT);
        history.truncate(HISTORY_LIMIT);
        write_value(&tx, HISTORY_KEY, &history_to_blob(&history)?)?;
        tx.commit()?;
        Ok((history.len(), evicted))
      })
      .await?;

    tracing::debug!(id = %record.id, len, evicted, "saved fact check");
    Ok(record)
  }

  async fn list(&self) -> Result<Vec<FactCheckRecord>> {
    Ok(history_from_blob(self.get_value(HISTORY_KEY).await?))
  }

  async fn delete(&self, id: Uuid) -> Result<()> {
    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut history = history_from_blob(read_value(&tx, HISTORY_KEY)?);
        let before = history.len();
        history.retain(|r| r.id != id);
        let removed = before != history.len();
        if removed {
          write_value(&tx, HISTORY_KEY, &history_to_blob(&history)?)?;
        }
        tx.commit()?;
        Ok(removed)
      })
      .await?;

    tracing::debug!(%id, removed, "deleted fact check");
    Ok(())
  }

  async fn clear(&self) -> Result<()> {
    self.remove_value(HISTORY_KEY).await?;
    tracing::debug!("cleared fact check history");
    Ok(())
  }
}

// ─── CredentialStore impl ────────────────────────────────────────────────────

impl CredentialStore for SqliteStore {
  type Error = Error;

  async fn load_api_key(&self) -> Result<Option<String>> {
    self.get_value(API_KEY_KEY).await
  }

  async fn save_api_key(&self, key: String) -> Result<()> {
    self
      .conn
      .call(move |conn| Ok(write_value(conn, API_KEY_KEY, &key)?))
      .await?;
    Ok(())
  }

  async fn clear_api_key(&self) -> Result<()> {
    self.remove_value(API_KEY_KEY).await
  }
}
