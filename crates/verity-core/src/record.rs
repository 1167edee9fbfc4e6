//! Record types — the persisted unit of fact-check history.
//!
//! A record is immutable once created. It is removed only by explicit
//! deletion or by eviction when the history exceeds [`HISTORY_LIMIT`].
//!
//! Field names on the wire follow the browser client's persisted format
//! (`isUrl`, `result`, `ratingSource`, `timestamp`, ...) so existing
//! history blobs stay readable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::Result;

/// Maximum number of records kept in history.
pub const HISTORY_LIMIT: usize = 50;

/// Source name used when a review omits its publisher.
pub const UNKNOWN_SOURCE: &str = "Unknown Source";

// ─── Rating ──────────────────────────────────────────────────────────────────

/// The fixed categorical outcome of a fact check.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  AsRefStr,
  EnumIter,
  EnumString,
)]
pub enum Rating {
  True,
  False,
  Mixed,
  Error,
  /// Also absorbs any unrecognised rating string found in persisted data.
  #[default]
  #[serde(other)]
  Unknown,
}

// ─── Confidence ──────────────────────────────────────────────────────────────

/// A confidence score in `[0, 1]`. Construction clamps; NaN becomes `0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
  pub const ZERO: Self = Self(0.0);

  pub fn new(value: f64) -> Self {
    if value.is_nan() { Self::ZERO } else { Self(value.clamp(0.0, 1.0)) }
  }

  pub fn value(self) -> f64 { self.0 }

  pub fn is_zero(self) -> bool { self.0 <= 0.0 }

  /// Rounded percentage, `0..=100`.
  pub fn percent(self) -> u8 { (self.0 * 100.0).round() as u8 }
}

impl<'de> Deserialize<'de> for Confidence {
  fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    f64::deserialize(deserializer).map(Self::new)
  }
}

// ─── Sources ─────────────────────────────────────────────────────────────────

/// One publisher's contribution to a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
  pub name:       String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url:        Option<String>,
  /// ISO 8601 date or date-time, as supplied.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date:       Option<String>,
  /// The source's own textual verdict.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub conclusion: Option<String>,
}

// ─── Verdict ─────────────────────────────────────────────────────────────────

/// Where a verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictOrigin {
  /// Derived from an upstream fact-check response (including error results).
  #[default]
  Upstream,
  /// Simulated locally; not authoritative.
  Fallback,
}

/// The normalized summary of a fact check.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
  #[serde(rename = "claim", skip_serializing_if = "Option::is_none")]
  pub claim_text:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub claimant:     Option<String>,
  pub rating:       Rating,
  /// Upstream wording kept when it matched no known rating family.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rating_label: Option<String>,
  pub confidence:   Confidence,
  pub sources:      Vec<SourceRecord>,

  // Single-source fields from before `sources` existed. For upstream
  // verdicts they mirror `sources[0]`.
  #[serde(rename = "ratingSource", skip_serializing_if = "Option::is_none")]
  pub primary_source_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub review_date:         Option<String>,
  #[serde(rename = "url", skip_serializing_if = "Option::is_none")]
  pub source_url:          Option<String>,

  pub origin: VerdictOrigin,
}

/// A verdict as found in persisted data. Older histories stored the raw
/// upstream wording directly in `rating` (e.g. `"Pants on Fire"`).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredVerdict {
  #[serde(rename = "claim", default)]
  claim_text:          Option<String>,
  #[serde(default)]
  claimant:            Option<String>,
  #[serde(default)]
  rating:              Option<String>,
  #[serde(default)]
  rating_label:        Option<String>,
  #[serde(default)]
  confidence:          Confidence,
  #[serde(default)]
  sources:             Vec<SourceRecord>,
  #[serde(rename = "ratingSource", default)]
  primary_source_name: Option<String>,
  #[serde(default)]
  review_date:         Option<String>,
  #[serde(rename = "url", default)]
  source_url:          Option<String>,
  #[serde(default)]
  origin:              VerdictOrigin,
}

impl From<StoredVerdict> for Verdict {
  fn from(raw: StoredVerdict) -> Self {
    let (rating, legacy_label) = match raw.rating.as_deref().map(str::trim) {
      None | Some("") => (Rating::Unknown, None),
      Some(text) => match text.parse::<Rating>() {
        Ok(rating) => (rating, None),
        Err(_) => (Rating::Unknown, Some(text.to_owned())),
      },
    };

    Self {
      claim_text: raw.claim_text,
      claimant: raw.claimant,
      rating,
      rating_label: raw.rating_label.or(legacy_label),
      confidence: raw.confidence,
      sources: raw.sources,
      primary_source_name: raw.primary_source_name,
      review_date: raw.review_date,
      source_url: raw.source_url,
      origin: raw.origin,
    }
  }
}

impl<'de> Deserialize<'de> for Verdict {
  fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    StoredVerdict::deserialize(deserializer).map(Self::from)
  }
}

impl Verdict {
  /// The verdict recorded when the upstream call fails.
  pub fn error() -> Self {
    Self { rating: Rating::Error, ..Self::default() }
  }

  /// Copy `sources[0]` into the legacy single-source fields. No-op when
  /// there are no sources.
  pub fn mirror_primary_source(&mut self) {
    if let Some(first) = self.sources.first() {
      self.primary_source_name = Some(first.name.clone());
      self.review_date = first.date.clone();
      self.source_url = first.url.clone();
    }
  }

  /// The rating text to show a user.
  pub fn display_rating(&self) -> &str {
    self.rating_label.as_deref().unwrap_or(self.rating.as_ref())
  }

  /// Number of sources to show, counting a legacy-only source as one.
  pub fn source_count(&self) -> usize {
    if !self.sources.is_empty() {
      self.sources.len()
    } else if self.primary_source_name.is_some() {
      1
    } else {
      0
    }
  }

  pub fn is_authoritative(&self) -> bool {
    self.origin == VerdictOrigin::Upstream
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A persisted fact-check result. Once written, no field is ever updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckRecord {
  pub id:           Uuid,
  pub query:        String,
  #[serde(rename = "isUrl")]
  pub is_url_query: bool,
  #[serde(rename = "result")]
  pub verdict:      Verdict,
  /// Store-assigned; persisted as milliseconds since the epoch.
  #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::HistoryStore::save`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFactCheck {
  pub query:        String,
  pub is_url_query: bool,
  pub verdict:      Verdict,
}

impl NewFactCheck {
  /// Build the persisted record. Upstream verdicts get their legacy fields
  /// re-derived from `sources[0]` so the two representations cannot drift.
  pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> FactCheckRecord {
    let mut verdict = self.verdict;
    if verdict.origin == VerdictOrigin::Upstream {
      verdict.mirror_primary_source();
    }
    FactCheckRecord {
      id,
      query: self.query,
      is_url_query: self.is_url_query,
      verdict,
      created_at,
    }
  }
}

// ─── History blob ────────────────────────────────────────────────────────────

/// Serialise a history collection, most-recent-first.
pub fn encode_history(records: &[FactCheckRecord]) -> Result<String> {
  Ok(serde_json::to_string(records)?)
}

/// Parse a history collection written by [`encode_history`] (or by the
/// browser client).
pub fn decode_history(raw: &str) -> Result<Vec<FactCheckRecord>> {
  Ok(serde_json::from_str(raw)?)
}
