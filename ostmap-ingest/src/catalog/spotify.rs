//! Spotify Web API client
//!
//! Client-credentials auth (the engine only reads public catalog data),
//! bounded search, track detail, and audio features. Requests are
//! rate-limited with a minimum interval and carry a hard timeout; the
//! bearer token is cached and refreshed on demand.

use super::client::{CatalogClient, CatalogError, CatalogTrack};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ostmap_common::models::AudioFeatures;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const AUTH_URL: &str = "https://accounts.spotify.com/api/token";
const API_BASE: &str = "https://api.spotify.com/v1";
const USER_AGENT: &str = "ostmap/0.1.0 (https://github.com/ostmap/ostmap)";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const RATE_LIMIT_MS: u64 = 250;
/// Refresh the token this long before the catalog says it expires
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

/// Rate limiter enforcing a minimum interval between requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with the rate limit
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Spotify catalog client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    client_id: String,
    client_secret: String,
    market: String,
    token: Mutex<Option<CachedToken>>,
    rate_limiter: RateLimiter,
}

impl SpotifyClient {
    pub fn new(
        client_id: String,
        client_secret: String,
        market: String,
    ) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            client_id,
            client_secret,
            market,
            token: Mutex::new(None),
            rate_limiter: RateLimiter::new(RATE_LIMIT_MS),
        })
    }

    /// Get a valid bearer token, refreshing through the client-credentials
    /// grant when the cached one is missing or near expiry.
    async fn bearer_token(&self) -> Result<String, CatalogError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        let basic = BASE64.encode(format!("{}:{}", self.client_id, self.client_secret));

        let response = self
            .http_client
            .post(AUTH_URL)
            .header("Authorization", format!("Basic {}", basic))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::AuthFailed(format!("{}: {}", status, body)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        let expires_in = token
            .expires_in
            .saturating_sub(TOKEN_EXPIRY_MARGIN_SECS)
            .max(1);
        let value = token.access_token.clone();
        *cached = Some(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(expires_in),
        });

        tracing::debug!("Catalog token refreshed (valid {}s)", expires_in);

        Ok(value)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        self.rate_limiter.wait().await;
        let token = self.bearer_token().await?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();

        if status == 404 {
            return Err(CatalogError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[async_trait]
impl CatalogClient for SpotifyClient {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<CatalogTrack>, CatalogError> {
        let limit_str = limit.to_string();
        let url = format!("{}/search", API_BASE);

        tracing::debug!(query = %query, limit, "Catalog search");

        let response: SearchResponse = self
            .get_json(
                &url,
                &[
                    ("q", query),
                    ("type", "track"),
                    ("limit", &limit_str),
                    ("market", &self.market),
                ],
            )
            .await?;

        let tracks = response
            .tracks
            .map(|page| page.items.into_iter().map(CatalogTrack::from).collect())
            .unwrap_or_default();

        Ok(tracks)
    }

    async fn track(&self, track_id: &str) -> Result<CatalogTrack, CatalogError> {
        let url = format!("{}/tracks/{}", API_BASE, track_id);
        let wire: WireTrack = self
            .get_json(&url, &[("market", &self.market)])
            .await
            .map_err(|e| match e {
                CatalogError::NotFound(_) => CatalogError::NotFound(track_id.to_string()),
                other => other,
            })?;

        Ok(wire.into())
    }

    async fn audio_features(
        &self,
        track_id: &str,
    ) -> Result<Option<AudioFeatures>, CatalogError> {
        let url = format!("{}/audio-features/{}", API_BASE, track_id);

        match self.get_json::<WireFeatures>(&url, &[]).await {
            Ok(wire) => Ok(Some(AudioFeatures {
                energy: wire.energy,
                valence: wire.valence,
                tempo: wire.tempo,
                key: wire.key,
                duration_ms: wire.duration_ms,
            })),
            // Not every track has an analysis; absence is not a failure
            Err(CatalogError::NotFound(_)) => Ok(None),
            Err(CatalogError::Api(status, body)) => {
                tracing::warn!(track_id = %track_id, status, "No audio features: {}", body);
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<WireTrack>,
}

#[derive(Debug, Deserialize)]
struct WireTrack {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<WireArtist>,
    album: Option<WireAlbum>,
    preview_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WireAlbum {
    id: Option<String>,
    name: String,
    #[serde(default)]
    images: Vec<WireImage>,
}

#[derive(Debug, Deserialize)]
struct WireImage {
    url: String,
}

#[derive(Debug, Deserialize)]
struct WireFeatures {
    energy: f32,
    valence: f32,
    tempo: f32,
    key: i32,
    duration_ms: u64,
}

impl From<WireTrack> for CatalogTrack {
    fn from(wire: WireTrack) -> Self {
        let artist = wire
            .artists
            .first()
            .map(|a| a.name.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        let (album_id, album_title, image_url) = match wire.album {
            Some(album) => (
                album.id,
                album.name,
                album.images.first().map(|i| i.url.clone()),
            ),
            None => (None, String::new(), None),
        };

        Self {
            id: wire.id,
            title: wire.name,
            artist,
            album_id,
            album_title,
            preview_url: wire.preview_url,
            image_url,
        }
    }
}
