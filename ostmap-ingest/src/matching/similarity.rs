//! Similarity scoring between raw title strings
//!
//! Both inputs are normalized first, then scored with a
//! Ratcliff/Obershelp-style sequence ratio over characters (the classic
//! "matching subsequences" ratio). Pure function, range [0, 1].

use super::normalize;
use similar::TextDiff;

/// Score two raw strings for closeness after normalization.
///
/// Identical non-empty normalized strings score 1.0; disjoint strings
/// score near 0.
pub fn similarity(a: &str, b: &str) -> f32 {
    let a = normalize(a);
    let b = normalize(b);
    TextDiff::from_chars(a.as_str(), b.as_str()).ratio()
}
