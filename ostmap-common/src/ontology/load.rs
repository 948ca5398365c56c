//! Ontology definition loading
//!
//! The definition is a static, versioned TOML document listing concepts
//! (id, kind, per-language labels, relation id lists). It is parsed once
//! at process start; a parse or read failure is fatal.

use super::{Concept, ConceptGraph};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Definition bundled with the crate; used when no external path is
/// configured.
const BUILTIN_DEFINITION: &str = include_str!("../../assets/ontology.toml");

#[derive(Debug, Deserialize)]
struct OntologyDoc {
    version: String,
    #[serde(default, rename = "concept")]
    concepts: Vec<Concept>,
}

/// Parse a definition document from TOML text
pub fn load_from_str(text: &str) -> Result<ConceptGraph> {
    let doc: OntologyDoc =
        toml::from_str(text).map_err(|e| Error::Ontology(format!("definition parse: {}", e)))?;
    ConceptGraph::build(doc.version, doc.concepts)
}

/// Load a definition document from a file
pub fn load_from_path(path: &Path) -> Result<ConceptGraph> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::Ontology(format!("definition read {}: {}", path.display(), e))
    })?;
    load_from_str(&text)
}

/// Load the definition bundled with the crate
pub fn load_builtin() -> Result<ConceptGraph> {
    load_from_str(BUILTIN_DEFINITION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::ConceptKind;

    #[test]
    fn test_builtin_definition_loads() {
        let graph = load_builtin().unwrap();
        assert!(!graph.is_empty());
        // The auto-tagger's target concepts must all exist
        for id in [
            "exciting",
            "rest",
            "sentimental",
            "pop",
            "action",
            "sf",
            "romance",
            "tension",
            "animation",
            "catalog",
            "movie-ost",
        ] {
            assert!(graph.get(id).is_some(), "builtin definition missing {}", id);
        }
    }

    #[test]
    fn test_builtin_relations_resolve() {
        let graph = load_builtin().unwrap();
        for concept in graph.concepts() {
            for target in concept
                .broader
                .iter()
                .chain(&concept.narrower)
                .chain(&concept.related)
            {
                assert!(
                    graph.get(target).is_some(),
                    "{} points at unknown {}",
                    concept.id,
                    target
                );
            }
        }
    }

    #[test]
    fn test_load_from_str_minimal() {
        let graph = load_from_str(
            r#"
            version = "test"

            [[concept]]
            id = "pop"
            kind = "category-root"
            narrower = ["k-pop"]
            [concept.labels]
            en = "Pop"

            [[concept]]
            id = "k-pop"
            kind = "leaf-tag"
            broader = ["pop"]
            [concept.labels]
            en = "K-Pop"
            ko = "케이팝"
            "#,
        )
        .unwrap();

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.version(), "test");
        assert_eq!(graph.get("k-pop").unwrap().kind, ConceptKind::LeafTag);
        assert_eq!(graph.find_by_label_or_id("케이팝").unwrap().id, "k-pop");
    }

    #[test]
    fn test_malformed_definition_is_fatal() {
        let result = load_from_str("version = ");
        assert!(matches!(result, Err(Error::Ontology(_))));
    }
}
