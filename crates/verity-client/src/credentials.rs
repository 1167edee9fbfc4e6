//! The upstream API credential.

use std::fmt;

/// A non-empty, trimmed API key. `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
  /// Trim `raw`; `None` if nothing is left.
  pub fn parse(raw: &str) -> Option<Self> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
  }

  pub fn expose(&self) -> &str { &self.0 }
}

impl fmt::Debug for ApiKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("ApiKey(***)")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_trims_and_rejects_blank() {
    assert_eq!(ApiKey::parse("  abc \n").unwrap().expose(), "abc");
    assert!(ApiKey::parse("   ").is_none());
    assert!(ApiKey::parse("").is_none());
  }

  #[test]
  fn debug_is_redacted() {
    let key = ApiKey::parse("super-secret").unwrap();
    assert!(!format!("{key:?}").contains("super-secret"));
  }
}
