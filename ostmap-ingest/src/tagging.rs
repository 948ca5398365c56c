//! Rule-based auto-tagging
//!
//! Derives an initial tag set for a freshly ingested track from two
//! signal sources: numeric audio features (energy/valence thresholds)
//! and the movie's genre keywords (substring table). Provenance tags
//! mark where a track came from. The raw set is widened through the
//! ontology's storage expansion before it is persisted, so a leaf tag
//! also lands under its immediate categories.

use ostmap_common::models::AudioFeatures;
use ostmap_common::TagExpander;
use std::collections::BTreeSet;

/// Feature thresholds, matched to the catalog's 0..1 feature scale
const ENERGY_HIGH: f32 = 0.7;
const ENERGY_LOW: f32 = 0.4;
const VALENCE_LOW: f32 = 0.3;
const VALENCE_HIGH: f32 = 0.7;

/// Genre keyword containment table. Keys are the feed's source-language
/// genre fragments; matching is case-sensitive substring containment.
const GENRE_TAGS: &[(&str, &str)] = &[
    ("액션", "action"),
    ("SF", "sf"),
    ("코미디", "exciting"),
    ("드라마", "sentimental"),
    ("멜로", "romance"),
    ("로맨스", "romance"),
    ("공포", "tension"),
    ("호러", "tension"),
    ("스릴러", "tension"),
    ("범죄", "tension"),
    ("애니메이션", "animation"),
    ("가족", "rest"),
    ("뮤지컬", "pop"),
];

/// Every ingested track carries this source marker
const TAG_CATALOG: &str = "catalog";
/// Tracks discovered via the movie pipeline additionally carry this
const TAG_MOVIE_OST: &str = "movie-ost";

/// How a track entered the system, which decides its provenance tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOrigin {
    /// Matched to a movie by the batch pipeline
    Movie,
    /// Looked up directly by track id
    Direct,
}

/// Derives and widens tag sets for ingested tracks
#[derive(Debug, Clone)]
pub struct AutoTagger {
    expander: TagExpander,
}

impl AutoTagger {
    pub fn new(expander: TagExpander) -> Self {
        Self { expander }
    }

    /// Full tag set for a track: feature rules union genre rules union provenance,
    /// each widened via storage expansion.
    pub fn tags_for(
        &self,
        features: Option<&AudioFeatures>,
        genres: &[String],
        origin: TrackOrigin,
    ) -> BTreeSet<String> {
        let mut raw = BTreeSet::new();

        if let Some(features) = features {
            raw.extend(Self::feature_tags(features));
        }
        raw.extend(Self::genre_tags(genres));

        raw.insert(TAG_CATALOG.to_string());
        if origin == TrackOrigin::Movie {
            raw.insert(TAG_MOVIE_OST.to_string());
        }

        let mut widened = BTreeSet::new();
        for tag in &raw {
            widened.extend(self.expander.expand_for_storage(tag));
        }

        tracing::debug!(raw = raw.len(), widened = widened.len(), "Derived tags");
        widened
    }

    /// Threshold rules over the 0..1 feature scale
    fn feature_tags(features: &AudioFeatures) -> BTreeSet<String> {
        let mut tags = BTreeSet::new();
        if features.energy > ENERGY_HIGH {
            tags.insert("exciting".to_string());
        }
        if features.energy < ENERGY_LOW {
            tags.insert("rest".to_string());
        }
        if features.valence < VALENCE_LOW {
            tags.insert("sentimental".to_string());
        }
        if features.valence > VALENCE_HIGH {
            tags.insert("pop".to_string());
        }
        tags
    }

    /// Substring containment against the keyword table
    fn genre_tags(genres: &[String]) -> BTreeSet<String> {
        let mut tags = BTreeSet::new();
        for genre in genres {
            for (keyword, tag) in GENRE_TAGS {
                if genre.contains(keyword) {
                    tags.insert((*tag).to_string());
                }
            }
        }
        tags
    }
}
