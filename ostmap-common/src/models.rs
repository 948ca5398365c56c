//! Data models shared across the OSTMAP engine

use serde::{Deserialize, Serialize};

/// Pitch-class names for the integer musical key reported by the catalog
pub const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Map a catalog key integer (0-11) to its pitch-class name.
///
/// The catalog reports -1 for "no key detected".
pub fn pitch_class_name(key: i32) -> Option<&'static str> {
    if (0..12).contains(&key) {
        Some(PITCH_CLASSES[key as usize])
    } else {
        None
    }
}

/// A ranked movie from the box-office feed with its known title variants.
///
/// Transient input to the match selector; one batch cycle consumes a fresh
/// list. Title variants are in descending match priority: original-language
/// title, English title, then the primary display title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Feed-side movie identifier (the feed keys movies by display title)
    pub movie_id: String,
    /// Primary display title (localized)
    pub title: String,
    /// Box-office rank (1-based)
    pub rank: u32,
    /// English title, if the feed knows one
    pub title_en: Option<String>,
    /// Original-language title, if the feed knows one
    pub title_og: Option<String>,
    /// Genre keywords in the feed's source language
    pub genres: Vec<String>,
    /// Poster image URL, if a poster lookup succeeded
    pub poster_url: Option<String>,
}

impl CatalogItem {
    pub fn new(movie_id: impl Into<String>, rank: u32) -> Self {
        let movie_id = movie_id.into();
        Self {
            title: movie_id.clone(),
            movie_id,
            rank,
            title_en: None,
            title_og: None,
            genres: Vec::new(),
            poster_url: None,
        }
    }
}

/// Audio-feature vector for a track, as reported by the external catalog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    /// Perceived intensity, 0.0-1.0
    pub energy: f32,
    /// Musical positiveness, 0.0-1.0
    pub valence: f32,
    /// Tempo in BPM
    pub tempo: f32,
    /// Pitch class 0-11, or -1 when undetected
    pub key: i32,
    /// Track duration in milliseconds
    pub duration_ms: u64,
}

/// A track record as persisted by the store.
///
/// Created lazily the first time a track is referenced (by a successful
/// match or a direct lookup) and never structurally changed afterwards,
/// only extended with new tag assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// External catalog track id
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album_id: Option<String>,
    pub preview_url: Option<String>,
    pub image_url: Option<String>,
    pub features: Option<AudioFeatures>,
}

/// A persisted (track, concept) membership pair.
///
/// Unordered set semantics: inserting an existing pair is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagAssignment {
    pub track_id: String,
    pub concept_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_class_name_valid_range() {
        assert_eq!(pitch_class_name(0), Some("C"));
        assert_eq!(pitch_class_name(9), Some("A"));
        assert_eq!(pitch_class_name(11), Some("B"));
    }

    #[test]
    fn test_pitch_class_name_undetected() {
        assert_eq!(pitch_class_name(-1), None);
        assert_eq!(pitch_class_name(12), None);
    }

    #[test]
    fn test_catalog_item_defaults_title_to_movie_id() {
        let item = CatalogItem::new("파묘", 1);
        assert_eq!(item.title, "파묘");
        assert_eq!(item.movie_id, "파묘");
        assert!(item.genres.is_empty());
    }
}
