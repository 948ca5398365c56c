//! Catalog client contract and result types

use async_trait::async_trait;
use ostmap_common::models::AudioFeatures;
use thiserror::Error;

/// Catalog client errors
///
/// All of these are recoverable at the call site: a failed search counts
/// as zero results for that candidate, a failed feature fetch as "no
/// features". They never abort a batch.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Client-credentials handshake failed
    #[error("Catalog auth failed: {0}")]
    AuthFailed(String),

    /// Network communication error (transport, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Catalog API returned an error response
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Failed to parse API response JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// Track id unknown to the catalog
    #[error("Track not found: {0}")]
    NotFound(String),
}

/// A track as returned by catalog search or lookup
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogTrack {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album_id: Option<String>,
    pub album_title: String,
    pub preview_url: Option<String>,
    pub image_url: Option<String>,
}

/// Search-by-text and fetch-audio-features capability of the external
/// music catalog.
///
/// Every call is a network operation with a timeout; callers must treat
/// failures as empty results and carry on.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Bounded text search, best matches first
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<CatalogTrack>, CatalogError>;

    /// Full track detail by catalog id
    async fn track(&self, track_id: &str) -> Result<CatalogTrack, CatalogError>;

    /// Audio-feature vector for a track. `Ok(None)` when the catalog has
    /// no analysis for it.
    async fn audio_features(
        &self,
        track_id: &str,
    ) -> Result<Option<AudioFeatures>, CatalogError>;
}
