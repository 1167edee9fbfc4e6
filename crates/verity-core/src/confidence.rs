//! Confidence estimation from result cardinality.
//!
//! More independent reviews raise confidence, but a single upstream query
//! never reaches certainty: the ceiling is [`MAX_CONFIDENCE`].

use crate::{record::Confidence, upstream::ClaimSearchResponse};

/// A claim exists but no publisher has reviewed it.
pub const UNREVIEWED_CONFIDENCE: f64 = 0.2;
pub const BASE_CONFIDENCE: f64 = 0.5;
pub const PER_REVIEW_CONFIDENCE: f64 = 0.1;
pub const MAX_CONFIDENCE: f64 = 0.9;

/// Estimate from the number of claims and the number of reviews on the
/// first claim.
pub fn estimate(claim_count: usize, first_claim_reviews: usize) -> Confidence {
  let raw = match (claim_count, first_claim_reviews) {
    (0, _) => 0.0,
    (_, 0) => UNREVIEWED_CONFIDENCE,
    (_, r) => (BASE_CONFIDENCE + PER_REVIEW_CONFIDENCE * r as f64).min(MAX_CONFIDENCE),
  };
  Confidence::new(raw)
}

pub fn estimate_response(response: &ClaimSearchResponse) -> Confidence {
  estimate(response.claims.len(), response.first_reviews().len())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn close(a: Confidence, b: f64) -> bool { (a.value() - b).abs() < 1e-9 }

  #[test]
  fn no_claims_is_zero() {
    assert_eq!(estimate(0, 0).value(), 0.0);
    assert_eq!(estimate(0, 7).value(), 0.0);
  }

  #[test]
  fn unreviewed_claim() {
    assert_eq!(estimate(3, 0).value(), 0.2);
  }

  #[test]
  fn grows_with_reviews_then_caps() {
    assert!(close(estimate(1, 1), 0.6));
    assert!(close(estimate(1, 3), 0.8));
    assert!(close(estimate(1, 4), 0.9));
    assert!(close(estimate(1, 40), 0.9));
  }

  #[test]
  fn monotonic_and_bounded() {
    let mut last = 0.0;
    for r in 1..=100 {
      let c = estimate(1, r).value();
      assert!((0.0..=MAX_CONFIDENCE).contains(&c), "r={r} c={c}");
      assert!(c >= last);
      last = c;
    }
  }
}
