//! Simulated fallback verdicts.
//!
//! Used when the upstream service returns nothing useful. The shape is
//! fixed; only the confidence draw varies. Records produced here carry
//! [`VerdictOrigin::Fallback`] and the [`FALLBACK_SOURCE_NAME`] tag so
//! callers can tell them apart from real results.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::{
  query::QueryKind,
  record::{Confidence, NewFactCheck, Rating, SourceRecord, Verdict, VerdictOrigin},
};

pub const FALLBACK_SOURCE_NAME: &str = "Fallback Verification System";

/// Claim text used in place of a URL query.
pub const URL_CLAIM_TEXT: &str = "Content from this URL";

const SIMULATED_SOURCES: [(&str, &str, &str); 3] = [
  (
    "Fact Check Central",
    "https://example.com/factcheck1",
    "This claim requires further investigation.",
  ),
  (
    "Truth Detector",
    "https://example.com/factcheck2",
    "Our analysis shows this claim is partially accurate.",
  ),
  (
    "Fact Verification Institute",
    "https://example.com/factcheck3",
    "Multiple sources confirm this claim needs context.",
  ),
];

/// Bucket a draw from `[0, 1)`: below 0.3 is `False`, below 0.6 `Mixed`,
/// the rest `True`.
pub fn bucket(draw: f64) -> Rating {
  if draw < 0.3 {
    Rating::False
  } else if draw < 0.6 {
    Rating::Mixed
  } else {
    Rating::True
  }
}

/// Build a simulated check for `query` from a uniform `draw` in `[0, 1)`.
pub fn simulate(query: &str, kind: QueryKind, draw: f64, now: DateTime<Utc>) -> NewFactCheck {
  let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
  let sources = SIMULATED_SOURCES
    .iter()
    .map(|(name, url, conclusion)| SourceRecord {
      name:       (*name).to_owned(),
      url:        Some((*url).to_owned()),
      date:       Some(stamp.clone()),
      conclusion: Some((*conclusion).to_owned()),
    })
    .collect();

  let claim_text = if kind.is_url() { URL_CLAIM_TEXT.to_owned() } else { query.to_owned() };

  NewFactCheck {
    query:        query.to_owned(),
    is_url_query: kind.is_url(),
    verdict:      Verdict {
      claim_text: Some(claim_text),
      rating: bucket(draw),
      confidence: Confidence::new(draw),
      sources,
      primary_source_name: Some(FALLBACK_SOURCE_NAME.to_owned()),
      review_date: Some(now.format("%Y-%m-%d").to_string()),
      origin: VerdictOrigin::Fallback,
      ..Verdict::default()
    },
  }
}
