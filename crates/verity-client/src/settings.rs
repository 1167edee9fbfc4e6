//! Client configuration.
//!
//! Layered with the `config` crate: an optional TOML file, overridden by
//! `VERITY_*` environment variables (e.g. `VERITY_API_KEY`). Keys missing
//! from both fall back to [`ClientConfig::default`].

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use serde::Deserialize;

use crate::{upstream::DEFAULT_ENDPOINT, Result};

/// Runtime client configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
  /// Claim-search endpoint.
  pub endpoint:             String,
  /// Takes precedence over a persisted key when set.
  pub api_key:              Option<String>,
  pub request_timeout_secs: u64,
  /// Artificial latency before a simulated fallback result; `0` disables it.
  pub fallback_delay_ms:    u64,
  /// SQLite file holding history and the persisted key. `~/` is expanded.
  pub store_path:           PathBuf,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      endpoint:             DEFAULT_ENDPOINT.to_owned(),
      api_key:              None,
      request_timeout_secs: 30,
      fallback_delay_ms:    1500,
      store_path:           PathBuf::from("~/.local/share/verity/verity.db"),
    }
  }
}

impl ClientConfig {
  /// Load from `path` (if given and present) and the environment.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
      builder = builder.add_source(config::File::from(path).required(false));
    }
    let settings = builder
      .add_source(config::Environment::with_prefix("VERITY"))
      .build()?;

    Ok(settings.try_deserialize()?)
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }

  pub fn fallback_delay(&self) -> Duration {
    Duration::from_millis(self.fallback_delay_ms)
  }

  /// `store_path` with a leading `~` expanded to the user's home directory.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn file_values_override_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
      file,
      "api_key = \"from-file\"\nfallback_delay_ms = 0\nstore_path = \"/tmp/verity-test.db\""
    )
    .unwrap();

    let cfg = ClientConfig::load(Some(file.path())).unwrap();
    assert_eq!(cfg.api_key.as_deref(), Some("from-file"));
    assert_eq!(cfg.fallback_delay(), Duration::ZERO);
    assert_eq!(cfg.store_path, PathBuf::from("/tmp/verity-test.db"));
    // Untouched keys keep their defaults.
    assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(cfg.request_timeout(), Duration::from_secs(30));
  }

  #[test]
  fn missing_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ClientConfig::load(Some(dir.path().join("absent.toml").as_path())).unwrap();
    assert_eq!(cfg.request_timeout_secs, 30);
  }

  #[test]
  fn absolute_store_path_is_untouched() {
    let cfg = ClientConfig {
      store_path: PathBuf::from("/var/lib/verity.db"),
      ..ClientConfig::default()
    };
    assert_eq!(cfg.resolved_store_path(), PathBuf::from("/var/lib/verity.db"));
  }
}
