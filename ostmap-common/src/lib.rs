//! # OSTMAP Common Library
//!
//! Shared code for the OSTMAP soundtrack engine:
//! - Error and result types
//! - Configuration loading
//! - Data models (tracks, catalog items, tag assignments)
//! - Tag ontology (concept graph + expansion)
//! - Persistence store contract and SQLite implementation
//! - Time/format utilities

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod ontology;
pub mod time;

pub use error::{Error, Result};
pub use ontology::{Concept, ConceptGraph, ConceptKind, TagExpander};
