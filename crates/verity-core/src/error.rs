//! Error types for `verity-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
