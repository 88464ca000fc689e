//! Collaborator traits defining the interfaces between components.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::RankedHit;

/// Semantic similarity search over an embedding index.
///
/// Returns up to `limit` hits, best first, with similarity-scale scores
/// (higher = more similar; range is implementation-defined).
#[async_trait]
pub trait VectorRetriever: Send + Sync {
    async fn retrieve(&self, query: &str, limit: usize) -> Result<Vec<RankedHit>>;
}

/// Lexical keyword search over a text index.
///
/// Returns up to `limit` hits, best first, with relevance-scale scores.
/// Score ranges are not comparable across engines; fusion relies on ranks
/// only.
#[async_trait]
pub trait TextRetriever: Send + Sync {
    async fn retrieve(&self, query: &str, limit: usize) -> Result<Vec<RankedHit>>;
}

/// Embedding model trait: black-box text to vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of document texts.
    async fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query text.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    /// Get the embedding dimension.
    fn dimension(&self) -> usize;
}
