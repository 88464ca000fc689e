//! Search orchestration: concurrent retrieval, degradation, fusion.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use fusion_core::{
    FusionConfig, RankedHit, Result, RetrievalConfig, SearchError, SearchPath, SearchResults,
    TextRetriever, VectorRetriever,
};

use crate::fusion::reciprocal_rank_fusion;

/// Drives one hybrid search: issues the vector and text retrievals
/// concurrently, tolerates single-path failures, and fuses whatever
/// settled.
///
/// Both collaborators are injected at construction; the orchestrator holds
/// no other state, so concurrent `search` calls are fully independent.
/// Dropping the future returned by [`search`](Self::search) cancels both
/// in-flight retrievals and yields no result.
pub struct SearchOrchestrator<V, T> {
    /// Semantic retrieval path.
    vector: Arc<V>,

    /// Lexical retrieval path.
    text: Arc<T>,

    /// Per-path deadline and fetch floor.
    retrieval: RetrievalConfig,
}

impl<V, T> SearchOrchestrator<V, T>
where
    V: VectorRetriever,
    T: TextRetriever,
{
    /// Create an orchestrator with default retrieval settings.
    pub fn new(vector: Arc<V>, text: Arc<T>) -> Self {
        Self {
            vector,
            text,
            retrieval: RetrievalConfig::default(),
        }
    }

    /// Override the retrieval settings.
    pub fn with_retrieval_config(mut self, retrieval: RetrievalConfig) -> Self {
        self.retrieval = retrieval;
        self
    }

    /// Perform a hybrid search.
    ///
    /// Fails with `InvalidQuery`/`InvalidConfig` before any retrieval is
    /// issued, and with `RetrievalFailure` only when both paths fail; a
    /// single failed or timed-out path degrades to an empty list. The fused
    /// ordering depends only on the retrieved lists and the config, never
    /// on which path finished first.
    pub async fn search(&self, query: &str, config: FusionConfig) -> Result<SearchResults> {
        let start = Instant::now();

        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::invalid_query("query is empty"));
        }
        config.validate()?;

        info!("Searching for: {:?}", query);

        // Fetch deeper than the final limit so fusion has candidates to
        // promote. Both paths always run; a zero weight only silences a
        // path's term during fusion.
        let fetch_limit = config.limit.saturating_mul(2).max(self.retrieval.min_fetch);

        let (vector_out, text_out) = tokio::join!(
            self.bounded(SearchPath::Vector, self.vector.retrieve(query, fetch_limit)),
            self.bounded(SearchPath::Text, self.text.retrieve(query, fetch_limit)),
        );

        let (vector_list, text_list) = match (vector_out, text_out) {
            (Err(vector), Err(text)) => {
                return Err(SearchError::RetrievalFailure {
                    vector: Box::new(vector),
                    text: Box::new(text),
                });
            }
            (vector_out, text_out) => (
                self.settle(SearchPath::Vector, query, vector_out),
                self.settle(SearchPath::Text, query, text_out),
            ),
        };

        debug!(
            "Vector path returned {} hits, text path returned {} hits",
            vector_list.len(),
            text_list.len()
        );

        let results = reciprocal_rank_fusion(vector_list, text_list, &config);
        let latency_ms = start.elapsed().as_millis() as u64;

        info!(
            "Search completed in {}ms, returned {} results",
            latency_ms,
            results.len()
        );

        Ok(SearchResults {
            query: query.to_string(),
            total_results: results.len(),
            latency_ms,
            results,
        })
    }

    /// Bound one retrieval call by the per-path deadline.
    async fn bounded<F>(&self, path: SearchPath, retrieve: F) -> Result<Vec<RankedHit>>
    where
        F: Future<Output = Result<Vec<RankedHit>>>,
    {
        let budget = Duration::from_millis(self.retrieval.timeout_ms);
        match timeout(budget, retrieve).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout {
                path,
                elapsed_ms: self.retrieval.timeout_ms,
            }),
        }
    }

    /// Degrade a failed path to an empty list, recording the cause.
    fn settle(
        &self,
        path: SearchPath,
        query: &str,
        outcome: Result<Vec<RankedHit>>,
    ) -> Vec<RankedHit> {
        match outcome {
            Ok(hits) => hits,
            Err(e) => {
                warn!(
                    "{} retrieval degraded to empty for {:?}: {}",
                    path, query, e
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a canned list regardless of the query.
    struct Fixed {
        hits: Vec<RankedHit>,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(hits: Vec<RankedHit>) -> Self {
            Self {
                hits,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VectorRetriever for Fixed {
        async fn retrieve(&self, _query: &str, limit: usize) -> Result<Vec<RankedHit>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.hits.iter().take(limit).cloned().collect())
        }
    }

    #[async_trait]
    impl TextRetriever for Fixed {
        async fn retrieve(&self, _query: &str, limit: usize) -> Result<Vec<RankedHit>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.hits.iter().take(limit).cloned().collect())
        }
    }

    /// Always fails.
    struct Failing;

    #[async_trait]
    impl VectorRetriever for Failing {
        async fn retrieve(&self, _query: &str, _limit: usize) -> Result<Vec<RankedHit>> {
            Err(SearchError::retrieval(SearchPath::Vector, "index offline"))
        }
    }

    #[async_trait]
    impl TextRetriever for Failing {
        async fn retrieve(&self, _query: &str, _limit: usize) -> Result<Vec<RankedHit>> {
            Err(SearchError::retrieval(SearchPath::Text, "index offline"))
        }
    }

    /// Derives its hits from the query, so results betray which query
    /// produced them.
    struct Echo {
        path: &'static str,
    }

    #[async_trait]
    impl VectorRetriever for Echo {
        async fn retrieve(&self, query: &str, _limit: usize) -> Result<Vec<RankedHit>> {
            tokio::task::yield_now().await;
            Ok(vec![
                hit(&format!("{}/{}/1", query, self.path), 0.9),
                hit(&format!("{}/{}/2", query, self.path), 0.8),
            ])
        }
    }

    #[async_trait]
    impl TextRetriever for Echo {
        async fn retrieve(&self, query: &str, _limit: usize) -> Result<Vec<RankedHit>> {
            tokio::task::yield_now().await;
            Ok(vec![
                hit(&format!("{}/{}/1", query, self.path), 5.0),
                hit(&format!("{}/{}/2", query, self.path), 4.0),
            ])
        }
    }

    /// Sleeps past any test deadline before answering.
    struct Slow {
        hits: Vec<RankedHit>,
    }

    #[async_trait]
    impl VectorRetriever for Slow {
        async fn retrieve(&self, _query: &str, _limit: usize) -> Result<Vec<RankedHit>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(self.hits.clone())
        }
    }

    fn hit(id: &str, score: f32) -> RankedHit {
        RankedHit::new(id, score, format!("content of {}", id))
    }

    fn hits(ids: &[&str]) -> Vec<RankedHit> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| hit(id, 1.0 - i as f32 * 0.1))
            .collect()
    }

    #[tokio::test]
    async fn test_empty_query_rejected_before_retrieval() {
        let vector = Arc::new(Fixed::new(hits(&["a"])));
        let text = Arc::new(Fixed::new(hits(&["b"])));
        let orchestrator = SearchOrchestrator::new(vector.clone(), text.clone());

        let err = orchestrator
            .search("   ", FusionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery { .. }));
        assert_eq!(vector.calls.load(Ordering::SeqCst), 0);
        assert_eq!(text.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_before_retrieval() {
        let vector = Arc::new(Fixed::new(hits(&["a"])));
        let text = Arc::new(Fixed::new(hits(&["b"])));
        let orchestrator = SearchOrchestrator::new(vector.clone(), text.clone());

        let config = FusionConfig {
            vector_weight: 0.0,
            text_weight: 0.0,
            ..Default::default()
        };
        let err = orchestrator.search("query", config).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig { .. }));
        assert_eq!(vector.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fuses_both_paths() {
        let vector = Arc::new(Fixed::new(hits(&["a", "b"])));
        let text = Arc::new(Fixed::new(hits(&["b", "c"])));
        let orchestrator = SearchOrchestrator::new(vector, text);

        let results = orchestrator
            .search("query", FusionConfig::default())
            .await
            .unwrap();

        assert_eq!(results.query, "query");
        assert_eq!(results.total_results, 3);
        // "b" appears in both lists and outranks the single-path documents.
        assert_eq!(results.results[0].document_id, "b");
    }

    #[tokio::test]
    async fn test_single_path_failure_degrades() {
        let vector = Arc::new(Failing);
        let text = Arc::new(Fixed::new(hits(&["x", "y"])));
        let orchestrator = SearchOrchestrator::new(vector, text);

        let results = orchestrator
            .search("query", FusionConfig::default())
            .await
            .unwrap();

        let ids: Vec<_> = results
            .results
            .iter()
            .map(|h| h.document_id.as_str())
            .collect();
        assert_eq!(ids, ["x", "y"]);
        assert!(results.results.iter().all(|h| h.vector_rank.is_none()));
    }

    #[tokio::test]
    async fn test_both_paths_failing_surfaces_both_causes() {
        let orchestrator = SearchOrchestrator::new(Arc::new(Failing), Arc::new(Failing));

        let err = orchestrator
            .search("query", FusionConfig::default())
            .await
            .unwrap_err();

        match err {
            SearchError::RetrievalFailure { vector, text } => {
                assert!(matches!(*vector, SearchError::Retrieval { .. }));
                assert!(matches!(*text, SearchError::Retrieval { .. }));
            }
            other => panic!("expected RetrievalFailure, got {}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_path_degrades() {
        let vector = Arc::new(Slow {
            hits: hits(&["never"]),
        });
        let text = Arc::new(Fixed::new(hits(&["x"])));
        let orchestrator = SearchOrchestrator::new(vector, text).with_retrieval_config(
            RetrievalConfig {
                timeout_ms: 50,
                ..Default::default()
            },
        );

        let results = orchestrator
            .search("query", FusionConfig::default())
            .await
            .unwrap();

        let ids: Vec<_> = results
            .results
            .iter()
            .map(|h| h.document_id.as_str())
            .collect();
        assert_eq!(ids, ["x"]);
    }

    #[tokio::test]
    async fn test_huge_limit_does_not_overflow_fetch() {
        let vector = Arc::new(Fixed::new(hits(&["a"])));
        let text = Arc::new(Fixed::new(hits(&["b"])));
        let orchestrator = SearchOrchestrator::new(vector, text);

        let config = FusionConfig {
            limit: usize::MAX,
            ..Default::default()
        };
        let results = orchestrator.search("query", config).await.unwrap();
        assert_eq!(results.total_results, 2);
    }

    #[tokio::test]
    async fn test_zero_weight_path_still_fetched() {
        let vector = Arc::new(Fixed::new(hits(&["a"])));
        let text = Arc::new(Fixed::new(hits(&["b"])));
        let orchestrator = SearchOrchestrator::new(vector.clone(), text.clone());

        let config = FusionConfig {
            vector_weight: 0.0,
            ..Default::default()
        };
        orchestrator.search("query", config).await.unwrap();

        // Disabling a source is fusion's concern; retrieval still runs.
        assert_eq!(vector.calls.load(Ordering::SeqCst), 1);
        assert_eq!(text.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_searches_stay_independent() {
        let orchestrator = Arc::new(SearchOrchestrator::new(
            Arc::new(Echo { path: "vector" }),
            Arc::new(Echo { path: "text" }),
        ));

        let mut handles = Vec::new();
        for i in 0..16 {
            let orchestrator = orchestrator.clone();
            handles.push(tokio::spawn(async move {
                let query = format!("query-{}", i);
                let results = orchestrator
                    .search(&query, FusionConfig::default())
                    .await
                    .unwrap();
                (query, results)
            }));
        }

        for handle in handles {
            let (query, results) = handle.await.unwrap();
            // Every fused hit must come from this call's own retrieval
            // lists; any cross-call leak would carry another query's ids.
            assert!(!results.results.is_empty());
            let prefix = format!("{}/", query);
            for hit in &results.results {
                assert!(
                    hit.document_id.starts_with(&prefix),
                    "result {} leaked into search for {:?}",
                    hit.document_id,
                    query
                );
            }
        }
    }
}
