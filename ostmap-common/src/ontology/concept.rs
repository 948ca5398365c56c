//! Concept entity for the tag ontology

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Role of a concept in the vocabulary.
///
/// Used to resolve lookup ambiguity deterministically when a category and a
/// leaf tag share a bare name: category roots win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConceptKind {
    /// Top-of-hierarchy grouping concept
    CategoryRoot,
    /// Ordinary assignable tag
    LeafTag,
}

/// A node in the tag ontology.
///
/// Relations are stored as directed id lists, exactly as the definition
/// document declares them; `related` in particular is not assumed to be
/// symmetric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub id: String,
    pub kind: ConceptKind,
    /// Language code -> display label; at least one entry
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub broader: Vec<String>,
    #[serde(default)]
    pub narrower: Vec<String>,
    #[serde(default)]
    pub related: Vec<String>,
}

impl Concept {
    /// The concept's id plus every language label
    pub fn all_labels(&self) -> BTreeSet<String> {
        let mut labels: BTreeSet<String> = self.labels.values().cloned().collect();
        labels.insert(self.id.clone());
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concept(id: &str) -> Concept {
        let mut labels = BTreeMap::new();
        labels.insert("en".to_string(), "Pop".to_string());
        labels.insert("ko".to_string(), "팝".to_string());
        Concept {
            id: id.to_string(),
            kind: ConceptKind::CategoryRoot,
            labels,
            broader: vec![],
            narrower: vec![],
            related: vec![],
        }
    }

    #[test]
    fn test_all_labels_includes_id_and_every_language() {
        let labels = concept("pop").all_labels();
        assert!(labels.contains("pop"));
        assert!(labels.contains("Pop"));
        assert!(labels.contains("팝"));
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn test_kind_deserializes_kebab_case() {
        let kind: ConceptKind = serde_json::from_str("\"category-root\"").unwrap();
        assert_eq!(kind, ConceptKind::CategoryRoot);
        let kind: ConceptKind = serde_json::from_str("\"leaf-tag\"").unwrap();
        assert_eq!(kind, ConceptKind::LeafTag);
    }
}
