//! fusion-retrieve - Reference retriever and embedder implementations
//!
//! Real deployments plug production vector/text search services into the
//! `VectorRetriever` and `TextRetriever` traits. This crate provides the
//! offline stand-ins: a deterministic hash embedder, an in-memory index
//! serving both retrieval paths, and fixed/failing stubs for tests.

mod embed;
mod fixed;
mod memory;

pub use embed::HashEmbedder;
pub use fixed::{FailingRetriever, FixedRetriever};
pub use memory::{MemoryDocument, MemoryIndex};

// Re-export the collaborator traits for convenience
pub use fusion_core::{Embedder, TextRetriever, VectorRetriever};
