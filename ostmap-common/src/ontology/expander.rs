//! Tag expansion over the concept graph
//!
//! Two distinct traversal policies share the graph:
//!
//! - **ascend** widens a tag toward its parents at storage time, one hop
//!   only, so a persisted tag also carries its immediate categories.
//! - **descend** widens a query tag into its full synonym + sub-category
//!   closure: the concept, its labels, every transitive narrower
//!   descendant, and the related concepts (with labels) of every node
//!   visited on the way down.
//!
//! Both keep an explicit visited set and an iterative work list, so a
//! malformed (cyclic) definition terminates with each node visited at most
//! once instead of recursing forever.

use super::{Concept, ConceptGraph};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Storage-time and query-time tag widening over an immutable graph
#[derive(Debug, Clone)]
pub struct TagExpander {
    graph: Arc<ConceptGraph>,
}

impl TagExpander {
    pub fn new(graph: Arc<ConceptGraph>) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &ConceptGraph {
        &self.graph
    }

    /// Direct `broader` ids unioned with direct `related` ids, one hop only.
    ///
    /// Targets that name no known concept are skipped.
    pub fn ascend(&self, concept: &Concept) -> BTreeSet<String> {
        concept
            .broader
            .iter()
            .chain(&concept.related)
            .filter_map(|id| self.graph.get(id))
            .map(|c| c.id.clone())
            .collect()
    }

    /// The concept itself, all its labels, all transitive `narrower`
    /// descendants, and for every visited node its `related` concepts and
    /// their labels.
    ///
    /// `related` is treated as directed, as stored; related neighbors
    /// contribute themselves and their labels but are not descended into.
    pub fn descend(&self, concept: &Concept) -> BTreeSet<String> {
        let mut expansion = BTreeSet::new();
        let mut visited: BTreeSet<String> = BTreeSet::new();
        let mut stack: Vec<&Concept> = vec![concept];

        while let Some(current) = stack.pop() {
            if !visited.insert(current.id.to_lowercase()) {
                continue;
            }
            expansion.insert(current.id.clone());
            expansion.extend(current.all_labels());

            for related in current.related.iter().filter_map(|id| self.graph.get(id)) {
                expansion.insert(related.id.clone());
                expansion.extend(related.all_labels());
            }

            for narrower in current.narrower.iter().filter_map(|id| self.graph.get(id)) {
                stack.push(narrower);
            }
        }

        expansion
    }

    /// Query-time expansion of a user-supplied tag.
    ///
    /// A tag that matches no concept falls back to the raw literal as its
    /// own single-member expansion set rather than failing.
    pub fn expand_query(&self, text: &str) -> BTreeSet<String> {
        match self.graph.find_by_label_or_id(text) {
            Some(concept) => self.descend(concept),
            None => {
                tracing::debug!(tag = %text, "No concept for query tag; using raw literal");
                BTreeSet::from([text.to_string()])
            }
        }
    }

    /// Storage-time expansion of a tag about to be persisted: the concept
    /// id plus its one-hop ascent. Unknown tags fall back to the raw
    /// literal.
    pub fn expand_for_storage(&self, text: &str) -> BTreeSet<String> {
        match self.graph.find_by_label_or_id(text) {
            Some(concept) => {
                let mut expansion = self.ascend(concept);
                expansion.insert(concept.id.clone());
                expansion
            }
            None => {
                tracing::debug!(tag = %text, "No concept for stored tag; using raw literal");
                BTreeSet::from([text.to_string()])
            }
        }
    }
}
