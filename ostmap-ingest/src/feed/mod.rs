//! Box-office feed access
//!
//! Supplies the ranked movie list (with title variants and genre keywords)
//! consumed once per batch cycle. Trait-based so workflow tests can stub
//! the feed; [`KobisClient`] is the production implementation.

mod kobis;

pub use kobis::KobisClient;

use async_trait::async_trait;
use thiserror::Error;

/// Feed client errors. Recoverable: a failed feed call degrades to an
/// empty batch or empty movie metadata.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network communication error (transport, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Feed API returned an error response
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Failed to parse API response JSON
    #[error("Parse error: {0}")]
    Parse(String),
}

/// One entry of the daily box-office ranking
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMovie {
    pub rank: u32,
    pub title: String,
}

/// Title variants and genre keywords the feed knows for a movie
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieMetadata {
    /// Genre keywords in the feed's source language
    pub genres: Vec<String>,
    pub title_en: Option<String>,
    pub title_og: Option<String>,
}

/// Ranked-movie feed with per-movie metadata lookup
#[async_trait]
pub trait BoxOfficeFeed: Send + Sync {
    /// Daily ranking for `target_date` (YYYYMMDD), best rank first
    async fn daily_box_office(
        &self,
        target_date: &str,
        limit: usize,
    ) -> Result<Vec<RankedMovie>, FeedError>;

    /// Title variants and genres for a movie, looked up by display title
    async fn movie_metadata(&self, title: &str) -> Result<MovieMetadata, FeedError>;
}
