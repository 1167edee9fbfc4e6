//! Assembly of a [`Verdict`] from an upstream response.

use crate::{
  classify::classify,
  confidence::estimate_response,
  record::{Rating, Verdict},
  sources::extract,
  upstream::ClaimSearchResponse,
};

/// Run the estimator, classifier and extractor over `response` and assemble
/// the verdict. Never fails; an empty response yields `Unknown` at zero
/// confidence.
pub fn normalize(response: &ClaimSearchResponse) -> Verdict {
  let confidence = estimate_response(response);
  let sources = extract(response);

  let reviews = response.first_reviews();
  let (rating, rating_label) = if reviews.is_empty() {
    (Rating::Unknown, None)
  } else {
    let verdicts: Vec<&str> = reviews
      .iter()
      .map(|r| r.textual_rating.as_deref().unwrap_or("Unknown"))
      .collect();
    let c = classify(&verdicts);
    (c.rating, c.label)
  };

  let claim = response.first_claim();
  let mut verdict = Verdict {
    claim_text: claim.and_then(|c| c.text.clone()),
    claimant: claim.and_then(|c| c.claimant.clone()),
    rating,
    rating_label,
    confidence,
    sources,
    ..Verdict::default()
  };
  verdict.mirror_primary_source();
  verdict
}
