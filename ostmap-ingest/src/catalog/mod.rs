//! External music catalog access
//!
//! The engine talks to the catalog through the [`CatalogClient`] trait so
//! tests can stub it; [`SpotifyClient`] is the production implementation.

mod client;
mod spotify;

pub use client::{CatalogClient, CatalogError, CatalogTrack};
pub use spotify::SpotifyClient;
