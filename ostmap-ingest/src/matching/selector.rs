//! Match selection: candidate titles x catalog search x similarity
//!
//! For each candidate title (priority order) issue one bounded search,
//! score every returned track against that candidate on both its title
//! and its album title, and keep the single best score seen anywhere.
//! After all candidates are exhausted, accept the best track iff its
//! score clears the threshold. A later, lower-priority candidate can
//! still win: priority affects search order only.

use super::{candidate_titles, similarity};
use crate::catalog::{CatalogClient, CatalogTrack};
use ostmap_common::models::CatalogItem;
use std::sync::Arc;

/// Acceptance threshold for the best similarity score
pub const MATCH_THRESHOLD: f32 = 0.5;
/// Results requested per candidate search
pub const SEARCH_LIMIT: u32 = 5;
/// Fixed qualifier appended to every candidate query
const SEARCH_QUALIFIER: &str = "ost";

/// Outcome of match selection for one catalog item
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    /// Best track cleared the threshold
    Accepted {
        track: CatalogTrack,
        score: f32,
        /// The candidate title whose search surfaced the track
        candidate: String,
    },
    /// Every result scored below the threshold (or nothing came back)
    NoMatch {
        candidates_tried: usize,
        results_seen: usize,
    },
}

/// Picks one best track per catalog item, or declares no match
pub struct MatchSelector {
    catalog: Arc<dyn CatalogClient>,
    threshold: f32,
    search_limit: u32,
}

impl MatchSelector {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self {
            catalog,
            threshold: MATCH_THRESHOLD,
            search_limit: SEARCH_LIMIT,
        }
    }

    #[cfg(test)]
    fn with_threshold(catalog: Arc<dyn CatalogClient>, threshold: f32) -> Self {
        Self {
            catalog,
            threshold,
            search_limit: SEARCH_LIMIT,
        }
    }

    /// Run the selection loop over all candidate titles.
    ///
    /// A search call that errors counts as zero results for that candidate
    /// and the loop continues; the item degrades to `NoMatch` at worst.
    pub async fn select(&self, item: &CatalogItem) -> MatchOutcome {
        let candidates = candidate_titles(item);
        let mut best: Option<(f32, CatalogTrack, String)> = None;
        let mut results_seen = 0;

        for candidate in &candidates {
            let query = format!("{} {}", candidate, SEARCH_QUALIFIER);
            let results = match self.catalog.search(&query, self.search_limit).await {
                Ok(results) => results,
                Err(e) => {
                    tracing::warn!(
                        movie = %item.movie_id,
                        candidate = %candidate,
                        "Catalog search failed, treating as zero results: {}",
                        e
                    );
                    continue;
                }
            };

            results_seen += results.len();

            for track in results {
                let score = similarity(candidate, &track.title)
                    .max(similarity(candidate, &track.album_title));

                // Strictly-better wins; ties break on track id so the
                // outcome is independent of candidate order
                let better = match &best {
                    None => true,
                    Some((best_score, best_track, _)) => {
                        score > *best_score
                            || (score == *best_score && track.id < best_track.id)
                    }
                };
                if better {
                    best = Some((score, track, candidate.clone()));
                }
            }
        }

        match best {
            Some((score, track, candidate)) if score >= self.threshold => {
                tracing::info!(
                    movie = %item.movie_id,
                    track_id = %track.id,
                    title = %track.title,
                    score,
                    candidate = %candidate,
                    "Accepted soundtrack match"
                );
                MatchOutcome::Accepted {
                    track,
                    score,
                    candidate,
                }
            }
            _ => {
                tracing::info!(
                    movie = %item.movie_id,
                    candidates = candidates.len(),
                    results_seen,
                    best_score = best.as_ref().map(|(s, _, _)| *s).unwrap_or(0.0),
                    "No soundtrack match"
                );
                MatchOutcome::NoMatch {
                    candidates_tried: candidates.len(),
                    results_seen,
                }
            }
        }
    }
}
