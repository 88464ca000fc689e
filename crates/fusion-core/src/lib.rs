//! fusion-core - Core types and traits for hybrid search
//!
//! This crate provides the data contracts, configuration, error taxonomy,
//! and collaborator traits shared across the hybrid-search workspace.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{FusionConfig, HybridConfig, RetrievalConfig};
pub use error::{Result, SearchError, SearchPath};
pub use traits::{Embedder, TextRetriever, VectorRetriever};
pub use types::{FusedHit, RankedHit, SearchResults};
