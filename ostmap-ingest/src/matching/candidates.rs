//! Candidate title generation
//!
//! Orders a catalog item's known title variants by matching priority:
//! original-language title, English title, then the primary display
//! title. Duplicates collapse by exact string equality, keeping the
//! highest-priority occurrence. Priority affects search order only; the
//! accept decision is score-based.

use ostmap_common::models::CatalogItem;

/// Ordered, de-duplicated, non-empty title variants for a movie
pub fn candidate_titles(item: &CatalogItem) -> Vec<String> {
    let variants = [
        item.title_og.as_deref(),
        item.title_en.as_deref(),
        Some(item.title.as_str()),
    ];

    let mut candidates: Vec<String> = Vec::new();
    for title in variants.into_iter().flatten() {
        let title = title.trim();
        if !title.is_empty() && !candidates.iter().any(|c| c == title) {
            candidates.push(title.to_string());
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> CatalogItem {
        let mut item = CatalogItem::new("센과 치히로의 행방불명", 1);
        item.title_en = Some("Spirited Away".to_string());
        item.title_og = Some("千と千尋の神隠し".to_string());
        item
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            candidate_titles(&item()),
            vec![
                "千と千尋の神隠し".to_string(),
                "Spirited Away".to_string(),
                "센과 치히로의 행방불명".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_variants_skipped() {
        let mut item = item();
        item.title_og = None;
        assert_eq!(
            candidate_titles(&item),
            vec![
                "Spirited Away".to_string(),
                "센과 치히로의 행방불명".to_string()
            ]
        );
    }

    #[test]
    fn test_duplicates_collapse_to_highest_priority() {
        let mut item = CatalogItem::new("Oppenheimer", 1);
        item.title_en = Some("Oppenheimer".to_string());
        item.title_og = Some("Oppenheimer".to_string());
        assert_eq!(candidate_titles(&item), vec!["Oppenheimer".to_string()]);
    }

    #[test]
    fn test_near_duplicates_kept() {
        // De-duplication is exact string equality, not normalization
        let mut item = CatalogItem::new("oppenheimer", 1);
        item.title_en = Some("Oppenheimer".to_string());
        assert_eq!(
            candidate_titles(&item),
            vec!["Oppenheimer".to_string(), "oppenheimer".to_string()]
        );
    }

    #[test]
    fn test_blank_variants_skipped() {
        let mut item = CatalogItem::new("파묘", 1);
        item.title_en = Some("   ".to_string());
        assert_eq!(candidate_titles(&item), vec!["파묘".to_string()]);
    }
}
