//! Error type for `verity-client`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No API key is configured; raised before any network attempt.
  #[error("no fact-check API key configured")]
  MissingApiKey,

  #[error("query is empty")]
  EmptyQuery,

  #[error("upstream request failed: {0}")]
  UpstreamRequest(#[from] UpstreamFailure),

  #[error("upstream response is malformed: {0}")]
  UpstreamParse(#[from] serde_json::Error),

  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

/// Status class of a non-2xx upstream response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UpstreamFailure {
  #[error("invalid API key or malformed request")]
  MalformedRequest,
  #[error("API key unauthorized or quota exceeded")]
  Unauthorized,
  #[error("unexpected status {0}")]
  Status(u16),
}

impl UpstreamFailure {
  pub fn from_status(status: u16) -> Self {
    match status {
      400 => Self::MalformedRequest,
      403 => Self::Unauthorized,
      other => Self::Status(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
