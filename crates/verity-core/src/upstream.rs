//! Wire types for the upstream claim-search response.
//!
//! The upstream schema is loose: every field may be missing, and list fields
//! may be absent rather than empty. All fields therefore default.

use serde::{Deserialize, Serialize};

/// Top-level body of a `claims:search` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSearchResponse {
  #[serde(default)]
  pub claims:          Vec<Claim>,
  #[serde(default)]
  pub next_page_token: Option<String>,
}

impl ClaimSearchResponse {
  /// The claim every analysis step looks at; later claims are ignored.
  pub fn first_claim(&self) -> Option<&Claim> { self.claims.first() }

  /// Reviews attached to the first claim, or an empty slice.
  pub fn first_reviews(&self) -> &[ClaimReview] {
    self
      .first_claim()
      .map(|c| c.claim_review.as_slice())
      .unwrap_or_default()
  }
}

/// An assertion as indexed by the upstream service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
  #[serde(default)]
  pub text:         Option<String>,
  #[serde(default)]
  pub claimant:     Option<String>,
  #[serde(default)]
  pub claim_date:   Option<String>,
  #[serde(default)]
  pub claim_review: Vec<ClaimReview>,
}

/// One publisher's adjudication of a claim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReview {
  #[serde(default)]
  pub publisher:      Option<Publisher>,
  #[serde(default)]
  pub url:            Option<String>,
  #[serde(default)]
  pub title:          Option<String>,
  #[serde(default)]
  pub review_date:    Option<String>,
  #[serde(default)]
  pub textual_rating: Option<String>,
  #[serde(default)]
  pub language_code:  Option<String>,
}

impl ClaimReview {
  pub fn publisher_name(&self) -> Option<&str> {
    self.publisher.as_ref().and_then(|p| p.name.as_deref())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publisher {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub site: Option<String>,
}
