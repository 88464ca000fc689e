//! Stub retrievers for tests and wiring drills.

use async_trait::async_trait;

use fusion_core::{RankedHit, Result, SearchError, SearchPath, TextRetriever, VectorRetriever};

/// Retriever that returns a canned list regardless of the query.
///
/// Implements both retrieval traits so one type can stand in for either
/// path when unit-testing fusion and orchestration with fixed literal
/// inputs.
pub struct FixedRetriever {
    hits: Vec<RankedHit>,
}

impl FixedRetriever {
    /// Create a retriever returning the given hits, best first.
    pub fn new(hits: Vec<RankedHit>) -> Self {
        Self { hits }
    }

    fn take(&self, limit: usize) -> Vec<RankedHit> {
        self.hits.iter().take(limit).cloned().collect()
    }
}

#[async_trait]
impl VectorRetriever for FixedRetriever {
    async fn retrieve(&self, _query: &str, limit: usize) -> Result<Vec<RankedHit>> {
        Ok(self.take(limit))
    }
}

#[async_trait]
impl TextRetriever for FixedRetriever {
    async fn retrieve(&self, _query: &str, limit: usize) -> Result<Vec<RankedHit>> {
        Ok(self.take(limit))
    }
}

/// Retriever that always fails, for degradation tests.
pub struct FailingRetriever {
    message: String,
}

impl FailingRetriever {
    /// Create a retriever failing with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl VectorRetriever for FailingRetriever {
    async fn retrieve(&self, _query: &str, _limit: usize) -> Result<Vec<RankedHit>> {
        Err(SearchError::retrieval(SearchPath::Vector, self.message.clone()))
    }
}

#[async_trait]
impl TextRetriever for FailingRetriever {
    async fn retrieve(&self, _query: &str, _limit: usize) -> Result<Vec<RankedHit>> {
        Err(SearchError::retrieval(SearchPath::Text, self.message.clone()))
    }
}
