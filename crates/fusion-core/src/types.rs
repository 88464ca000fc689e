//! Core domain types for hybrid search.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single hit returned by one retrieval path.
///
/// Immutable once produced by a retriever. A retrieval list is a
/// `Vec<RankedHit>` ordered best-first with no duplicate document ids;
/// duplicates are a retriever contract violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedHit {
    /// Opaque document identifier.
    pub document_id: String,

    /// Path-native score (similarity or relevance scale; not comparable
    /// across paths, which is why fusion is rank-based).
    pub score: f32,

    /// Document text content.
    pub content: String,

    /// Arbitrary metadata stored alongside the document.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl RankedHit {
    /// Create a hit without metadata.
    pub fn new(document_id: impl Into<String>, score: f32, content: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            score,
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    /// Attach metadata to the hit.
    pub fn with_metadata(mut self, metadata: HashMap<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A fused result row with per-path rank/score provenance.
///
/// A `None` rank means the document was not retrieved by that path and the
/// corresponding term contributed zero to `rrf_score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusedHit {
    /// Opaque document identifier.
    pub document_id: String,

    /// Weighted reciprocal-rank-fusion score (higher is better).
    pub rrf_score: f32,

    /// 1-based position in the vector retrieval list, if present.
    pub vector_rank: Option<u32>,

    /// Path-native score from the vector retriever, if present.
    pub vector_score: Option<f32>,

    /// 1-based position in the text retrieval list, if present.
    pub text_rank: Option<u32>,

    /// Path-native score from the text retriever, if present.
    pub text_score: Option<f32>,

    /// Document text content.
    pub content: String,

    /// Document metadata.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl FusedHit {
    /// Best single-path rank for this document.
    ///
    /// Used for deterministic tie-breaking: whichever document was ranked
    /// highest by either path wins a score tie.
    pub fn best_rank(&self) -> u32 {
        match (self.vector_rank, self.text_rank) {
            (Some(v), Some(t)) => v.min(t),
            (Some(v), None) => v,
            (None, Some(t)) => t,
            (None, None) => u32::MAX,
        }
    }
}

/// Search results container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    /// The original query (after trimming).
    pub query: String,

    /// Total results returned.
    pub total_results: usize,

    /// Search latency in milliseconds.
    pub latency_ms: u64,

    /// Fused results, best first.
    pub results: Vec<FusedHit>,
}
