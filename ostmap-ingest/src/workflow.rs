//! Batch ingest workflow
//!
//! One run: fetch the ranked movie list, then drive every movie through
//! the per-item pipeline (metadata -> match -> features -> auto-tag ->
//! persist) with bounded parallelism. Items are independent; one item
//! failing degrades that item only and never aborts the batch. All
//! persistence is upsert/set-insert, so re-running a batch (or two runs
//! overlapping) never duplicates state.

use crate::catalog::{CatalogClient, CatalogTrack};
use crate::feed::{BoxOfficeFeed, MovieMetadata};
use crate::matching::{MatchOutcome, MatchSelector};
use crate::tagging::{AutoTagger, TrackOrigin};
use futures::stream::{self, StreamExt};
use ostmap_common::db::TrackStore;
use ostmap_common::models::{AudioFeatures, CatalogItem, Track};
use ostmap_common::{Error, Result, TagExpander};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Counters for one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Items that ran the pipeline (cancelled items are not processed)
    pub processed: usize,
    /// Items that matched a track and persisted it
    pub matched: usize,
    /// Items where no result cleared the threshold
    pub no_match: usize,
    /// Items that failed mid-pipeline (store or other hard error)
    pub failed: usize,
    /// Newly inserted tag assignments across all matched items
    pub tags_assigned: usize,
}

enum ItemResult {
    Matched { tags_assigned: usize },
    NoMatch,
    Failed,
    Skipped,
}

/// Batch and single-track ingest orchestration
pub struct IngestPipeline {
    feed: Arc<dyn BoxOfficeFeed>,
    catalog: Arc<dyn CatalogClient>,
    store: Arc<dyn TrackStore>,
    selector: Arc<MatchSelector>,
    tagger: Arc<AutoTagger>,
    workers: usize,
}

impl IngestPipeline {
    pub fn new(
        feed: Arc<dyn BoxOfficeFeed>,
        catalog: Arc<dyn CatalogClient>,
        store: Arc<dyn TrackStore>,
        expander: TagExpander,
        workers: usize,
    ) -> Self {
        Self {
            feed,
            catalog: catalog.clone(),
            store,
            selector: Arc::new(MatchSelector::new(catalog)),
            tagger: Arc::new(AutoTagger::new(expander)),
            workers: workers.max(1),
        }
    }

    /// One batch run over the daily ranking for `target_date` (YYYYMMDD).
    ///
    /// A feed failure yields an empty batch rather than an error; the
    /// next scheduled run simply tries again. Cancellation stops
    /// scheduling new items and lets in-flight ones finish.
    pub async fn run_batch(
        &self,
        target_date: &str,
        limit: usize,
        cancel: CancellationToken,
    ) -> BatchSummary {
        let ranked = match self.feed.daily_box_office(target_date, limit).await {
            Ok(ranked) => ranked,
            Err(e) => {
                tracing::warn!(target_date, "Box office feed failed, empty batch: {}", e);
                return BatchSummary::default();
            }
        };

        tracing::info!(target_date, movies = ranked.len(), "Starting batch ingest");

        let results: Vec<ItemResult> = stream::iter(ranked)
            .map(|movie| {
                let cancel = cancel.clone();
                async move {
                    if cancel.is_cancelled() {
                        tracing::debug!(movie = %movie.title, "Cancelled before start");
                        return ItemResult::Skipped;
                    }
                    self.process_movie(&movie.title, movie.rank).await
                }
            })
            .buffer_unordered(self.workers)
            .collect()
            .await;

        let mut summary = BatchSummary::default();
        for result in results {
            match result {
                ItemResult::Matched { tags_assigned } => {
                    summary.processed += 1;
                    summary.matched += 1;
                    summary.tags_assigned += tags_assigned;
                }
                ItemResult::NoMatch => {
                    summary.processed += 1;
                    summary.no_match += 1;
                }
                ItemResult::Failed => {
                    summary.processed += 1;
                    summary.failed += 1;
                }
                ItemResult::Skipped => {}
            }
        }

        tracing::info!(
            target_date,
            processed = summary.processed,
            matched = summary.matched,
            no_match = summary.no_match,
            failed = summary.failed,
            tags_assigned = summary.tags_assigned,
            "Batch ingest finished"
        );
        summary
    }

    /// Per-item pipeline. Every external failure degrades the item;
    /// only store failures mark it failed.
    async fn process_movie(&self, title: &str, rank: u32) -> ItemResult {
        let metadata = match self.feed.movie_metadata(title).await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(movie = %title, "Metadata lookup failed, proceeding bare: {}", e);
                MovieMetadata::default()
            }
        };

        let mut item = CatalogItem::new(title, rank);
        item.title_en = metadata.title_en;
        item.title_og = metadata.title_og;
        item.genres = metadata.genres;

        if let Err(e) = self.store.upsert_movie(&item).await {
            tracing::error!(movie = %title, "Failed to persist movie: {}", e);
            return ItemResult::Failed;
        }

        let track = match self.selector.select(&item).await {
            MatchOutcome::Accepted { track, .. } => track,
            MatchOutcome::NoMatch { .. } => return ItemResult::NoMatch,
        };

        let features = self.fetch_features(&track.id).await;
        let tags = self
            .tagger
            .tags_for(features.as_ref(), &item.genres, TrackOrigin::Movie);

        match self
            .persist_match(&item.movie_id, track, features, &tags)
            .await
        {
            Ok(tags_assigned) => ItemResult::Matched { tags_assigned },
            Err(e) => {
                tracing::error!(movie = %title, "Failed to persist match: {}", e);
                ItemResult::Failed
            }
        }
    }

    /// Direct track ingest: first reference creates the record.
    ///
    /// Fetches detail and features from the catalog, auto-tags with no
    /// genre signal, and upserts. Unknown ids surface as `NotFound`.
    pub async fn ingest_track(&self, track_id: &str) -> Result<Track> {
        let detail = self
            .catalog
            .track(track_id)
            .await
            .map_err(|e| Error::NotFound(format!("track {}: {}", track_id, e)))?;

        let features = self.fetch_features(track_id).await;
        let tags = self.tagger.tags_for(features.as_ref(), &[], TrackOrigin::Direct);

        let track = build_track(detail, features);
        self.store.upsert_track(&track).await?;
        for tag in &tags {
            self.store.upsert_tag_assignment(&track.id, tag).await?;
        }

        tracing::info!(track_id = %track.id, tags = tags.len(), "Ingested track directly");
        Ok(track)
    }

    /// Feature fetch degrades to `None` on any client error
    async fn fetch_features(&self, track_id: &str) -> Option<AudioFeatures> {
        match self.catalog.audio_features(track_id).await {
            Ok(features) => features,
            Err(e) => {
                tracing::warn!(track_id, "Audio features unavailable: {}", e);
                None
            }
        }
    }

    async fn persist_match(
        &self,
        movie_id: &str,
        catalog_track: CatalogTrack,
        features: Option<AudioFeatures>,
        tags: &std::collections::BTreeSet<String>,
    ) -> Result<usize> {
        let track = build_track(catalog_track, features);
        self.store.upsert_track(&track).await?;
        self.store.link_movie_track(movie_id, &track.id).await?;

        let mut inserted = 0;
        for tag in tags {
            if self.store.upsert_tag_assignment(&track.id, tag).await? {
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

fn build_track(detail: CatalogTrack, features: Option<AudioFeatures>) -> Track {
    Track {
        id: detail.id,
        title: detail.title,
        artist: detail.artist,
        album_id: detail.album_id,
        preview_url: detail.preview_url,
        image_url: detail.image_url,
        features,
    }
}
