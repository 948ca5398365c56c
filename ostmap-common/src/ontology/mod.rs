//! Tag ontology: a small controlled vocabulary of concepts with
//! broader/narrower/related relations and multilingual labels.
//!
//! The graph is loaded once at process start from a static TOML definition
//! and is immutable for the process lifetime; a reload requires a fresh
//! load. All traversal is cycle-safe: the definition is expected to be
//! acyclic, but it is treated as an arbitrary directed graph.

mod concept;
mod expander;
mod graph;
mod load;

pub use concept::{Concept, ConceptKind};
pub use expander::TagExpander;
pub use graph::ConceptGraph;
pub use load::{load_builtin, load_from_path, load_from_str};
