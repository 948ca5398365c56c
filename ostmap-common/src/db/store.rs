//! Track store: the persistence contract the engine writes through
//!
//! Every write is an idempotent upsert. Tag assignments are set-inserts:
//! re-adding an existing (track, concept) pair is a no-op, so overlapping
//! batch runs converge on the same state.

use crate::models::{pitch_class_name, CatalogItem, Track};
use crate::time::ms_to_iso_duration;
use crate::Result;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

/// A track row as persisted (feature-derived columns flattened)
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRow {
    pub track_id: String,
    pub track_title: String,
    pub artist_name: String,
    pub album_id: Option<String>,
    pub preview_url: Option<String>,
    pub image_url: Option<String>,
    pub bpm: Option<f64>,
    pub music_key: Option<String>,
    pub duration: Option<String>,
}

/// Read/write contract the engine needs from a store
#[async_trait]
pub trait TrackStore: Send + Sync {
    /// Insert or update a track record. Idempotent.
    async fn upsert_track(&self, track: &Track) -> Result<()>;

    /// Fetch a track row by catalog id
    async fn get_track(&self, track_id: &str) -> Result<Option<TrackRow>>;

    /// Set-insert a (track, concept) pair. Returns true when the pair was
    /// newly inserted, false when it already existed.
    async fn upsert_tag_assignment(&self, track_id: &str, concept_id: &str) -> Result<bool>;

    /// Distinct track ids carrying any of the given tag ids
    async fn query_tracks_by_tag_ids(&self, tag_ids: &[String]) -> Result<Vec<String>>;

    /// Insert or update a movie record (rank and poster refresh per batch)
    async fn upsert_movie(&self, item: &CatalogItem) -> Result<()>;

    /// Link a movie to its matched soundtrack track, replacing any
    /// previous link (one linked track per movie).
    async fn link_movie_track(&self, movie_id: &str, track_id: &str) -> Result<()>;
}

/// SQLite-backed track store
#[derive(Debug, Clone)]
pub struct SqliteTrackStore {
    pool: SqlitePool,
}

impl SqliteTrackStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TrackStore for SqliteTrackStore {
    async fn upsert_track(&self, track: &Track) -> Result<()> {
        // Album cover rides along with the track payload
        if let Some(album_id) = &track.album_id {
            sqlx::query(
                r#"
                INSERT INTO albums (album_id, album_cover_url)
                VALUES (?, ?)
                ON CONFLICT(album_id) DO NOTHING
                "#,
            )
            .bind(album_id)
            .bind(&track.image_url)
            .execute(&self.pool)
            .await?;
        }

        let bpm = track.features.map(|f| f.tempo as f64);
        let music_key = track
            .features
            .and_then(|f| pitch_class_name(f.key))
            .map(str::to_string);
        let duration = track.features.map(|f| ms_to_iso_duration(f.duration_ms));

        sqlx::query(
            r#"
            INSERT INTO tracks (
                track_id, track_title, artist_name, album_id,
                preview_url, image_url, bpm, music_key, duration, views
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0)
            ON CONFLICT(track_id) DO UPDATE SET
                bpm = excluded.bpm,
                music_key = excluded.music_key,
                duration = excluded.duration,
                image_url = excluded.image_url
            "#,
        )
        .bind(&track.id)
        .bind(&track.title)
        .bind(&track.artist)
        .bind(&track.album_id)
        .bind(&track.preview_url)
        .bind(&track.image_url)
        .bind(bpm)
        .bind(music_key)
        .bind(duration)
        .execute(&self.pool)
        .await?;

        tracing::debug!(track_id = %track.id, title = %track.title, "Upserted track");

        Ok(())
    }

    async fn get_track(&self, track_id: &str) -> Result<Option<TrackRow>> {
        let row = sqlx::query(
            r#"
            SELECT track_id, track_title, artist_name, album_id,
                   preview_url, image_url, bpm, music_key, duration
            FROM tracks
            WHERE track_id = ?
            "#,
        )
        .bind(track_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| TrackRow {
            track_id: row.get("track_id"),
            track_title: row.get("track_title"),
            artist_name: row.get("artist_name"),
            album_id: row.get("album_id"),
            preview_url: row.get("preview_url"),
            image_url: row.get("image_url"),
            bpm: row.get("bpm"),
            music_key: row.get("music_key"),
            duration: row.get("duration"),
        }))
    }

    async fn upsert_tag_assignment(&self, track_id: &str, concept_id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO track_tags (track_id, tag_id)
            VALUES (?, ?)
            ON CONFLICT(track_id, tag_id) DO NOTHING
            "#,
        )
        .bind(track_id)
        .bind(concept_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn query_tracks_by_tag_ids(&self, tag_ids: &[String]) -> Result<Vec<String>> {
        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; tag_ids.len()].join(", ");
        let sql = format!(
            "SELECT DISTINCT track_id FROM track_tags WHERE tag_id IN ({})",
            placeholders
        );

        let mut query = sqlx::query_scalar::<_, String>(&sql);
        for tag_id in tag_ids {
            query = query.bind(tag_id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn upsert_movie(&self, item: &CatalogItem) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO movies (movie_id, title, rank, poster_url)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(movie_id) DO UPDATE SET
                rank = excluded.rank,
                poster_url = excluded.poster_url,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(&item.movie_id)
        .bind(&item.title)
        .bind(item.rank)
        .bind(&item.poster_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn link_movie_track(&self, movie_id: &str, track_id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM movie_osts WHERE movie_id = ?")
            .bind(movie_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO movie_osts (movie_id, track_id) VALUES (?, ?)")
            .bind(movie_id)
            .bind(track_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(movie_id = %movie_id, track_id = %track_id, "Linked movie to track");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AudioFeatures;

    async fn setup_store() -> SqliteTrackStore {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        crate::db::init_tables(&pool).await.unwrap();
        SqliteTrackStore::new(pool)
    }

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: "Mystery of Love".to_string(),
            artist: "Sufjan Stevens".to_string(),
            album_id: Some("alb1".to_string()),
            preview_url: Some("https://p.example/1".to_string()),
            image_url: Some("https://i.example/1".to_string()),
            features: Some(AudioFeatures {
                energy: 0.3,
                valence: 0.2,
                tempo: 102.0,
                key: 9,
                duration_ms: 248_000,
            }),
        }
    }

    #[tokio::test]
    async fn test_upsert_track_roundtrip() {
        let store = setup_store().await;
        store.upsert_track(&track("t1")).await.unwrap();

        let row = store.get_track("t1").await.unwrap().unwrap();
        assert_eq!(row.track_title, "Mystery of Love");
        assert_eq!(row.bpm, Some(102.0));
        assert_eq!(row.music_key.as_deref(), Some("A"));
        assert_eq!(row.duration.as_deref(), Some("PT4M8S"));
    }

    #[tokio::test]
    async fn test_upsert_track_twice_is_idempotent() {
        let store = setup_store().await;
        store.upsert_track(&track("t1")).await.unwrap();
        store.upsert_track(&track("t1")).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tracks")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_track_without_features_has_null_columns() {
        let store = setup_store().await;
        let mut t = track("t2");
        t.features = None;
        store.upsert_track(&t).await.unwrap();

        let row = store.get_track("t2").await.unwrap().unwrap();
        assert_eq!(row.bpm, None);
        assert_eq!(row.music_key, None);
        assert_eq!(row.duration, None);
    }

    #[tokio::test]
    async fn test_tag_assignment_set_semantics() {
        let store = setup_store().await;
        store.upsert_track(&track("t1")).await.unwrap();

        assert!(store.upsert_tag_assignment("t1", "city-pop").await.unwrap());
        // Re-inserting the same pair is a no-op
        assert!(!store.upsert_tag_assignment("t1", "city-pop").await.unwrap());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM track_tags")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_query_tracks_by_tag_ids_distinct() {
        let store = setup_store().await;
        store.upsert_tag_assignment("t1", "j-pop").await.unwrap();
        store.upsert_tag_assignment("t1", "city-pop").await.unwrap();
        store.upsert_tag_assignment("t2", "j-pop").await.unwrap();

        let mut ids = store
            .query_tracks_by_tag_ids(&["j-pop".to_string(), "city-pop".to_string()])
            .await
            .unwrap();
        ids.sort();
        assert_eq!(ids, vec!["t1".to_string(), "t2".to_string()]);

        let empty = store.query_tracks_by_tag_ids(&[]).await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_link_movie_track_replaces_previous() {
        let store = setup_store().await;
        store.link_movie_track("m1", "t1").await.unwrap();
        store.link_movie_track("m1", "t2").await.unwrap();

        let links: Vec<String> =
            sqlx::query_scalar("SELECT track_id FROM movie_osts WHERE movie_id = 'm1'")
                .fetch_all(store.pool())
                .await
                .unwrap();
        assert_eq!(links, vec!["t2".to_string()]);
    }

    #[tokio::test]
    async fn test_upsert_movie_refreshes_rank() {
        let store = setup_store().await;
        let mut item = CatalogItem::new("파묘", 3);
        store.upsert_movie(&item).await.unwrap();
        item.rank = 1;
        store.upsert_movie(&item).await.unwrap();

        let rank: i64 = sqlx::query_scalar("SELECT rank FROM movies WHERE movie_id = '파묘'")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(rank, 1);
    }
}
