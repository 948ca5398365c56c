//! Soundtrack matching engine
//!
//! Text normalization, similarity scoring, candidate title generation, and
//! the selector that drives them against the external catalog to pick one
//! best track per movie (or declare no match).

mod candidates;
mod normalize;
mod selector;
mod similarity;

pub use candidates::candidate_titles;
pub use normalize::normalize;
pub use selector::{MatchOutcome, MatchSelector, MATCH_THRESHOLD, SEARCH_LIMIT};
pub use similarity::similarity;
