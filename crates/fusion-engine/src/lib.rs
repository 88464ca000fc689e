//! fusion-engine - Hybrid retrieval ranking engine
//!
//! This crate combines a semantic (vector) retrieval path and a lexical
//! (text) retrieval path into one ranked result list using weighted
//! Reciprocal Rank Fusion (RRF).
//!
//! # Features
//!
//! - Rank-based fusion with tunable per-path weights and damping constant
//! - Per-result provenance (rank and native score from each path)
//! - Concurrent retrieval with independent per-path deadlines
//! - Graceful degradation when one retrieval path fails or times out
//!
//! # Example
//!
//! ```rust,ignore
//! use fusion_engine::SearchOrchestrator;
//! use fusion_core::FusionConfig;
//! use std::sync::Arc;
//!
//! let orchestrator = SearchOrchestrator::new(Arc::new(vector), Arc::new(text));
//! let results = orchestrator.search("error handling", FusionConfig::default()).await?;
//! ```

mod fusion;
mod orchestrator;

pub use fusion::reciprocal_rank_fusion;
pub use orchestrator::SearchOrchestrator;

// Re-export for convenience
pub use fusion_core::{FusedHit, FusionConfig, SearchResults};
