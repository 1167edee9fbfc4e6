//! Keyword classification of textual verdicts into a [`Rating`].
//!
//! Each verdict string is lower-cased and tested against three keyword
//! families by substring. A string can count toward more than one family.
//! Family counts are then compared in a fixed order in which `False` wins
//! ties with `True`, and both win ties with `Mixed`.

use crate::record::Rating;

const FALSE_KEYWORDS: &[&str] =
  &["false", "fake", "incorrect", "wrong", "misleading", "untrue"];
const TRUE_KEYWORDS: &[&str] = &["true", "correct", "accurate", "right", "valid"];
const MIXED_KEYWORDS: &[&str] =
  &["mostly", "partially", "half", "mixed", "unverified"];

/// Per-family match counts across a set of verdict strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FamilyCounts {
  pub false_count: usize,
  pub true_count:  usize,
  pub mixed_count: usize,
}

impl FamilyCounts {
  pub fn tally<S: AsRef<str>>(verdicts: &[S]) -> Self {
    verdicts.iter().fold(Self::default(), |mut acc, raw| {
      let text = raw.as_ref().to_lowercase();
      let hit = |words: &[&str]| words.iter().any(|w| text.contains(w));
      acc.false_count += usize::from(hit(FALSE_KEYWORDS));
      acc.true_count += usize::from(hit(TRUE_KEYWORDS));
      acc.mixed_count += usize::from(hit(MIXED_KEYWORDS));
      acc
    })
  }

  pub fn is_empty(&self) -> bool {
    self.false_count == 0 && self.true_count == 0 && self.mixed_count == 0
  }

  /// Resolve counts to a rating. `None` when no family matched at all.
  pub fn decide(&self) -> Option<Rating> {
    let Self { false_count: f, true_count: t, mixed_count: m } = *self;
    if self.is_empty() {
      None
    } else if f >= t && f >= m {
      Some(Rating::False)
    } else if t >= f && t >= m {
      Some(Rating::True)
    } else if m > 0 {
      Some(Rating::Mixed)
    } else {
      None
    }
  }
}

/// Result of classifying a set of verdict strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
  pub rating: Rating,
  /// The raw first verdict, kept when no keyword family matched.
  pub label:  Option<String>,
}

/// Classify verdict strings. Missing upstream ratings should be passed as
/// `"Unknown"` so they occupy their position without matching any family.
pub fn classify<S: AsRef<str>>(verdicts: &[S]) -> Classification {
  if let Some(rating) = FamilyCounts::tally(verdicts).decide() {
    return Classification { rating, label: None };
  }

  let label = verdicts
    .first()
    .map(|v| v.as_ref().trim())
    .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("unknown"))
    .map(str::to_owned);

  Classification { rating: Rating::Unknown, label }
}
