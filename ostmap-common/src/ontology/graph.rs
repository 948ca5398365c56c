//! In-memory concept graph with a case-insensitive label index
//!
//! Concepts live in an arena (`Vec<Concept>`); the label index maps the
//! lower-cased id and every lower-cased language label to arena positions.
//! The index is many-to-one: several labels/ids may resolve to the same
//! concept, and one bare name may resolve to several concepts.

use super::{Concept, ConceptKind};
use crate::{Error, Result};
use std::collections::HashMap;

/// Immutable concept graph, built once from a static definition.
///
/// Safe for unrestricted concurrent reads; share it behind an `Arc` and
/// inject it into whatever needs it.
#[derive(Debug)]
pub struct ConceptGraph {
    arena: Vec<Concept>,
    /// lower-cased id -> arena index (ids are unique)
    id_index: HashMap<String, usize>,
    /// lower-cased id or label -> arena indices, in definition order
    label_index: HashMap<String, Vec<usize>>,
    version: String,
}

impl ConceptGraph {
    /// Build a graph from a concept list.
    ///
    /// Rejects duplicate ids and concepts without labels. Relation targets
    /// that name no known concept are tolerated here and skipped at
    /// traversal time, with a warning per dangling target.
    pub fn build(version: impl Into<String>, concepts: Vec<Concept>) -> Result<Self> {
        let mut id_index = HashMap::new();
        let mut label_index: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, concept) in concepts.iter().enumerate() {
            if concept.labels.is_empty() {
                return Err(Error::Ontology(format!(
                    "concept '{}' has no labels",
                    concept.id
                )));
            }
            let key = concept.id.to_lowercase();
            if id_index.insert(key.clone(), idx).is_some() {
                return Err(Error::Ontology(format!(
                    "duplicate concept id '{}'",
                    concept.id
                )));
            }
            label_index.entry(key).or_default().push(idx);
            for label in concept.labels.values() {
                let entry = label_index.entry(label.to_lowercase()).or_default();
                if !entry.contains(&idx) {
                    entry.push(idx);
                }
            }
        }

        let graph = Self {
            arena: concepts,
            id_index,
            label_index,
            version: version.into(),
        };

        for concept in &graph.arena {
            for target in concept
                .broader
                .iter()
                .chain(&concept.narrower)
                .chain(&concept.related)
            {
                if graph.get(target).is_none() {
                    tracing::warn!(
                        concept = %concept.id,
                        target = %target,
                        "Concept relation points at unknown id; it will be skipped"
                    );
                }
            }
        }

        tracing::info!(
            concepts = graph.arena.len(),
            version = %graph.version,
            "Concept graph built"
        );

        Ok(graph)
    }

    /// Definition document version
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.arena.iter()
    }

    /// Exact id lookup, case-insensitive
    pub fn get(&self, id: &str) -> Option<&Concept> {
        self.id_index
            .get(&id.to_lowercase())
            .map(|&idx| &self.arena[idx])
    }

    /// Case-insensitive match against the id and any language label of any
    /// concept.
    ///
    /// When several concepts share the name, a category root wins over a
    /// leaf tag; remaining ties resolve to definition order, so the answer
    /// is deterministic for a given definition document.
    pub fn find_by_label_or_id(&self, text: &str) -> Option<&Concept> {
        let indices = self.label_index.get(&text.trim().to_lowercase())?;
        indices
            .iter()
            .map(|&idx| &self.arena[idx])
            .find(|c| c.kind == ConceptKind::CategoryRoot)
            .or_else(|| indices.first().map(|&idx| &self.arena[idx]))
    }

    /// The id plus every language label of the concept with this id
    pub fn all_labels(&self, id: &str) -> Option<std::collections::BTreeSet<String>> {
        self.get(id).map(Concept::all_labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn concept(id: &str, kind: ConceptKind, en: &str) -> Concept {
        let mut labels = BTreeMap::new();
        labels.insert("en".to_string(), en.to_string());
        Concept {
            id: id.to_string(),
            kind,
            labels,
            broader: vec![],
            narrower: vec![],
            related: vec![],
        }
    }

    #[test]
    fn test_get_is_case_insensitive() {
        let graph = ConceptGraph::build(
            "test",
            vec![concept("j-pop", ConceptKind::LeafTag, "J-Pop")],
        )
        .unwrap();
        assert!(graph.get("J-POP").is_some());
        assert!(graph.get("nope").is_none());
    }

    #[test]
    fn test_find_by_label_matches_any_language() {
        let mut c = concept("pop", ConceptKind::CategoryRoot, "Pop");
        c.labels.insert("ko".to_string(), "팝".to_string());
        let graph = ConceptGraph::build("test", vec![c]).unwrap();

        assert_eq!(graph.find_by_label_or_id("팝").unwrap().id, "pop");
        assert_eq!(graph.find_by_label_or_id("POP").unwrap().id, "pop");
        assert_eq!(graph.find_by_label_or_id(" pop ").unwrap().id, "pop");
    }

    #[test]
    fn test_ambiguous_name_prefers_category_root() {
        // A leaf tag and a category root sharing the bare name "pop"
        let leaf = concept("synth-pop", ConceptKind::LeafTag, "Pop");
        let root = concept("pop", ConceptKind::CategoryRoot, "Pop");
        // Leaf first in definition order; the root must still win
        let graph = ConceptGraph::build("test", vec![leaf, root]).unwrap();

        assert_eq!(graph.find_by_label_or_id("Pop").unwrap().id, "pop");
    }

    #[test]
    fn test_ambiguous_leaf_only_resolves_to_definition_order() {
        let first = concept("ballad", ConceptKind::LeafTag, "Slow");
        let second = concept("lofi", ConceptKind::LeafTag, "Slow");
        let graph = ConceptGraph::build("test", vec![first, second]).unwrap();

        assert_eq!(graph.find_by_label_or_id("slow").unwrap().id, "ballad");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = ConceptGraph::build(
            "test",
            vec![
                concept("pop", ConceptKind::CategoryRoot, "Pop"),
                concept("POP", ConceptKind::LeafTag, "Pop Again"),
            ],
        );
        assert!(matches!(result, Err(Error::Ontology(_))));
    }

    #[test]
    fn test_unlabeled_concept_rejected() {
        let mut c = concept("pop", ConceptKind::CategoryRoot, "Pop");
        c.labels.clear();
        assert!(matches!(
            ConceptGraph::build("test", vec![c]),
            Err(Error::Ontology(_))
        ));
    }
}
