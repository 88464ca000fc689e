//! In-memory reference index implementing both retrieval paths.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use fusion_core::{Embedder, RankedHit, Result, TextRetriever, VectorRetriever};

/// A document to index in memory.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryDocument {
    /// Opaque document identifier.
    pub document_id: String,

    /// Document text content.
    pub content: String,

    /// Arbitrary metadata stored with the document.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

struct IndexedEntry {
    document: MemoryDocument,
    embedding: Vec<f32>,
    tokens: Vec<String>,
}

/// In-memory index serving both the vector and the text retrieval path.
///
/// Embeds every document once at build time; immutable afterwards, so a
/// single instance can be shared behind two `Arc`s with no locking. The
/// vector path scores by cosine similarity, the text path by query-term
/// frequency over lowercase alphanumeric tokens.
pub struct MemoryIndex<E> {
    embedder: Arc<E>,
    entries: Vec<IndexedEntry>,
}

impl<E: Embedder> MemoryIndex<E> {
    /// Build an index by embedding the given documents.
    pub async fn build(embedder: Arc<E>, documents: Vec<MemoryDocument>) -> Result<Self> {
        let texts: Vec<&str> = documents.iter().map(|d| d.content.as_str()).collect();
        let embeddings = embedder.embed_documents(&texts).await?;

        let entries = documents
            .into_iter()
            .zip(embeddings)
            .map(|(document, embedding)| {
                let tokens = tokenize(&document.content);
                IndexedEntry {
                    document,
                    embedding,
                    tokens,
                }
            })
            .collect::<Vec<_>>();

        debug!("Built in-memory index with {} documents", entries.len());

        Ok(Self { embedder, entries })
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn to_hit(entry: &IndexedEntry, score: f32) -> RankedHit {
        RankedHit::new(
            entry.document.document_id.clone(),
            score,
            entry.document.content.clone(),
        )
        .with_metadata(entry.document.metadata.clone())
    }
}

#[async_trait]
impl<E: Embedder> VectorRetriever for MemoryIndex<E> {
    async fn retrieve(&self, query: &str, limit: usize) -> Result<Vec<RankedHit>> {
        let query_embedding = self.embedder.embed_query(query).await?;

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(idx, entry)| {
                let score = cosine_similarity(&query_embedding, &entry.embedding);
                score.is_finite().then_some((idx, score))
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        Ok(scored
            .into_iter()
            .map(|(idx, score)| Self::to_hit(&self.entries[idx], score))
            .collect())
    }
}

#[async_trait]
impl<E: Embedder> TextRetriever for MemoryIndex<E> {
    async fn retrieve(&self, query: &str, limit: usize) -> Result<Vec<RankedHit>> {
        let query_terms = tokenize(query);

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(idx, entry)| {
                let score = term_frequency_score(&query_terms, &entry.tokens);
                (score > 0.0).then_some((idx, score))
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        Ok(scored
            .into_iter()
            .map(|(idx, score)| Self::to_hit(&self.entries[idx], score))
            .collect())
    }
}

/// Lowercase alphanumeric tokens.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Matched query-term occurrences normalized by document length.
fn term_frequency_score(query_terms: &[String], doc_tokens: &[String]) -> f32 {
    if query_terms.is_empty() || doc_tokens.is_empty() {
        return 0.0;
    }
    let matches = doc_tokens
        .iter()
        .filter(|token| query_terms.contains(token))
        .count();
    matches as f32 / doc_tokens.len() as f32
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::HashEmbedder;

    fn doc(id: &str, content: &str) -> MemoryDocument {
        MemoryDocument {
            document_id: id.to_string(),
            content: content.to_string(),
            metadata: HashMap::new(),
        }
    }

    async fn index(docs: Vec<MemoryDocument>) -> MemoryIndex<HashEmbedder> {
        MemoryIndex::build(Arc::new(HashEmbedder::with_dimension(64)), docs)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_vector_path_ranks_identical_text_first() {
        let index = index(vec![
            doc("a", "completely unrelated words here"),
            doc("b", "rust ownership and borrowing"),
        ])
        .await;

        // The hash embedder maps identical text to the identical vector, so
        // an exact content match has cosine similarity 1.
        let hits = VectorRetriever::retrieve(&index, "rust ownership and borrowing", 10)
            .await
            .unwrap();
        assert_eq!(hits[0].document_id, "b");
        assert!((hits[0].score - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_text_path_scores_by_term_frequency() {
        let index = index(vec![
            doc("sparse", "rust appears once in this much longer sentence of filler"),
            doc("dense", "rust rust rust"),
            doc("none", "nothing relevant at all"),
        ])
        .await;

        let hits = TextRetriever::retrieve(&index, "rust", 10).await.unwrap();
        let ids: Vec<_> = hits.iter().map(|h| h.document_id.as_str()).collect();
        assert_eq!(ids, ["dense", "sparse"]);
    }

    #[tokio::test]
    async fn test_text_path_excludes_non_matching() {
        let index = index(vec![doc("a", "alpha beta"), doc("b", "gamma delta")]).await;

        let hits = TextRetriever::retrieve(&index, "alpha", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document_id, "a");
    }

    #[tokio::test]
    async fn test_limit_respected() {
        let docs: Vec<_> = (0..10)
            .map(|i| doc(&format!("d{}", i), &format!("document number {}", i)))
            .collect();
        let index = index(docs).await;

        let hits = VectorRetriever::retrieve(&index, "document", 3).await.unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_index() {
        let index = index(Vec::new()).await;
        assert!(index.is_empty());

        let hits = TextRetriever::retrieve(&index, "anything", 5).await.unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_tokenize_strips_punctuation() {
        assert_eq!(tokenize("Hello, World!"), ["hello", "world"]);
        assert_eq!(tokenize("  "), Vec::<String>::new());
    }

    #[test]
    fn test_cosine_similarity_bounds() {
        let a = [1.0, 0.0];
        let b = [0.0, 1.0];
        assert_eq!(cosine_similarity(&a, &a), 1.0);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
        assert_eq!(cosine_similarity(&a, &[]), 0.0);
    }
}
