//! Flattening of upstream reviews into [`SourceRecord`]s.

use crate::{
  record::{SourceRecord, UNKNOWN_SOURCE},
  upstream::{ClaimReview, ClaimSearchResponse},
};

impl From<&ClaimReview> for SourceRecord {
  fn from(review: &ClaimReview) -> Self {
    Self {
      name:       review.publisher_name().unwrap_or(UNKNOWN_SOURCE).to_owned(),
      url:        review.url.clone(),
      date:       review.review_date.clone(),
      conclusion: review.textual_rating.clone(),
    }
  }
}

/// One source per review on the first claim, in upstream order.
pub fn extract(response: &ClaimSearchResponse) -> Vec<SourceRecord> {
  response.first_reviews().iter().map(SourceRecord::from).collect()
}
