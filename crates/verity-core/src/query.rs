//! Query kind detection.

use serde::{Deserialize, Serialize};
use url::Url;

/// How a raw query string is sent upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
  /// Free text, searched as a claim.
  Text,
  /// An absolute URL, sent as a review-publisher site filter.
  Url,
}

impl QueryKind {
  /// A query is a URL iff it parses as an absolute URL. The input is not
  /// trimmed; surrounding whitespace is the caller's concern.
  pub fn detect(query: &str) -> Self {
    if Url::parse(query).is_ok() { Self::Url } else { Self::Text }
  }

  pub fn is_url(self) -> bool { matches!(self, Self::Url) }
}
