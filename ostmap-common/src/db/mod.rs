//! Database access for OSTMAP
//!
//! SQLite via sqlx. The engine only needs idempotent upserts and a
//! tag-to-tracks query; everything here is written so re-running a batch
//! (or two batches overlapping on the same items) never duplicates state.

mod store;

pub use store::{SqliteTrackStore, TrackStore};

use crate::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Connects to the engine database, creating the file and schema if needed.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// Create engine tables if they don't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS movies (
            movie_id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            rank INTEGER NOT NULL,
            poster_url TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS albums (
            album_id TEXT PRIMARY KEY,
            album_cover_url TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tracks (
            track_id TEXT PRIMARY KEY,
            track_title TEXT NOT NULL,
            artist_name TEXT NOT NULL,
            album_id TEXT,
            preview_url TEXT,
            image_url TEXT,
            bpm REAL,
            music_key TEXT,
            duration TEXT,
            views INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS movie_osts (
            movie_id TEXT NOT NULL,
            track_id TEXT NOT NULL,
            PRIMARY KEY (movie_id, track_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS track_tags (
            track_id TEXT NOT NULL,
            tag_id TEXT NOT NULL,
            PRIMARY KEY (track_id, tag_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (movies, albums, tracks, movie_osts, track_tags)");

    Ok(())
}
