//! Error types for hybrid search.

use thiserror::Error;

/// Result type alias using SearchError.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Which retrieval path an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPath {
    /// Semantic similarity search over embeddings.
    Vector,
    /// Lexical keyword search.
    Text,
}

impl std::fmt::Display for SearchPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vector => write!(f, "vector"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Errors that can occur during hybrid search.
///
/// All failure modes are per-call; nothing here is fatal to the process.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Query rejected before any retrieval was issued.
    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    /// Fusion configuration rejected before any retrieval was issued.
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// One retrieval path failed.
    #[error("{path} retrieval failed: {message}")]
    Retrieval { path: SearchPath, message: String },

    /// One retrieval path exceeded its deadline.
    #[error("{path} retrieval timed out after {elapsed_ms}ms")]
    Timeout { path: SearchPath, elapsed_ms: u64 },

    /// Both retrieval paths failed; carries both underlying causes.
    #[error("both retrieval paths failed (vector: {vector}) (text: {text})")]
    RetrievalFailure {
        vector: Box<SearchError>,
        text: Box<SearchError>,
    },

    /// Embedding model error.
    #[error("Embedding error: {message}")]
    Embedding { message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl SearchError {
    /// Create an invalid query error.
    pub fn invalid_query(reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            reason: reason.into(),
        }
    }

    /// Create an invalid config error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create a retrieval error for one path.
    pub fn retrieval(path: SearchPath, message: impl Into<String>) -> Self {
        Self::Retrieval {
            path,
            message: message.into(),
        }
    }

    /// Create an embedding error.
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get the error code for tool responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidQuery { .. } => "INVALID_QUERY",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
            Self::Retrieval { .. } => "RETRIEVAL_ERROR",
            Self::Timeout { .. } => "RETRIEVAL_TIMEOUT",
            Self::RetrievalFailure { .. } => "RETRIEVAL_FAILURE",
            Self::Embedding { .. } => "EMBEDDING_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Config { .. } => "CONFIG_ERROR",
        }
    }
}
