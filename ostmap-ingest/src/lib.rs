//! ostmap-ingest - soundtrack matching & tagging batch engine
//!
//! Consumes a ranked movie list from the box-office feed, resolves each
//! movie's soundtrack against the external music catalog, auto-tags the
//! matched tracks from audio features and genre keywords, widens the tags
//! through the concept graph, and persists everything through the track
//! store. The HTTP site that serves the results lives elsewhere; this
//! crate owns only the engine.

pub mod catalog;
pub mod feed;
pub mod matching;
pub mod tagging;
pub mod workflow;

pub use tagging::AutoTagger;
pub use workflow::{BatchSummary, IngestPipeline};
