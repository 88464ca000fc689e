//! MCP tool surface for hybrid search.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use fusion_core::{FusionConfig, RetrievalConfig, TextRetriever, VectorRetriever};
use fusion_engine::SearchOrchestrator;

/// Hybrid search MCP server state.
///
/// Wraps a `SearchOrchestrator` over injected retriever collaborators and
/// exposes it as the `hybrid_search` tool.
pub struct HybridMcpServer<V, T> {
    /// Search orchestrator.
    orchestrator: SearchOrchestrator<V, T>,

    /// Fallback fusion parameters for requests that omit them.
    defaults: FusionConfig,
}

/// Search request parameters.
#[derive(Debug, Deserialize, Serialize)]
pub struct SearchParams {
    /// The search query.
    pub query: String,

    /// Maximum number of results (server default if omitted).
    pub limit: Option<usize>,

    /// Weight for the vector path (server default if omitted).
    pub vector_weight: Option<f32>,

    /// Weight for the text path (server default if omitted).
    pub text_weight: Option<f32>,

    /// RRF damping constant (server default if omitted).
    pub rrf_k: Option<f32>,
}

/// Tool result.
#[derive(Debug, Serialize)]
pub struct ToolResult {
    /// Whether the operation was successful.
    pub success: bool,

    /// Result message or content.
    pub message: String,
}

impl ToolResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl<V, T> HybridMcpServer<V, T>
where
    V: VectorRetriever,
    T: TextRetriever,
{
    /// Create a server over the given retriever pair.
    pub fn new(vector: Arc<V>, text: Arc<T>) -> Self {
        info!("Initializing hybrid search MCP server");

        Self {
            orchestrator: SearchOrchestrator::new(vector, text),
            defaults: FusionConfig::default(),
        }
    }

    /// Override the default fusion parameters.
    pub fn with_defaults(mut self, defaults: FusionConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Override the retrieval scheduling parameters.
    pub fn with_retrieval_config(mut self, retrieval: RetrievalConfig) -> Self {
        self.orchestrator = self.orchestrator.with_retrieval_config(retrieval);
        self
    }

    /// Get the server info.
    pub fn info() -> ServerInfo {
        ServerInfo {
            name: "hybrid-search".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Hybrid vector + text search with reciprocal rank fusion".to_string(),
        }
    }

    /// List available tools.
    pub fn tools() -> Vec<ToolInfo> {
        vec![ToolInfo {
            name: "hybrid_search".to_string(),
            description:
                "Search documents by combining semantic and keyword retrieval with RRF".to_string(),
        }]
    }

    /// Run a hybrid search and format the fused results.
    pub async fn search(&self, params: SearchParams) -> ToolResult {
        info!("Searching for: {:?}", params.query);

        let config = FusionConfig {
            vector_weight: params.vector_weight.unwrap_or(self.defaults.vector_weight),
            text_weight: params.text_weight.unwrap_or(self.defaults.text_weight),
            rrf_k: params.rrf_k.unwrap_or(self.defaults.rrf_k),
            limit: params.limit.unwrap_or(self.defaults.limit),
        };

        match self.orchestrator.search(&params.query, config).await {
            Ok(results) => {
                let mut output = format!(
                    "Found {} results in {}ms:\n\n",
                    results.total_results, results.latency_ms
                );

                for (idx, hit) in results.results.iter().enumerate() {
                    output.push_str(&format!(
                        "---\n[{}] {} (rrf: {:.4}, vector: {}, text: {})\n",
                        idx + 1,
                        hit.document_id,
                        hit.rrf_score,
                        provenance(hit.vector_rank, hit.vector_score),
                        provenance(hit.text_rank, hit.text_score),
                    ));
                    output.push_str(&format!("{}\n\n", hit.content));
                }

                ToolResult::success(output)
            }
            Err(e) => ToolResult::error(format!("[{}] Search failed: {}", e.error_code(), e)),
        }
    }
}

/// Render one path's rank/score pair, or mark the path as absent.
fn provenance(rank: Option<u32>, score: Option<f32>) -> String {
    match (rank, score) {
        (Some(rank), Some(score)) => format!("#{} @ {:.3}", rank, score),
        _ => "-".to_string(),
    }
}

/// Server info.
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

/// Tool info.
#[derive(Debug, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}
