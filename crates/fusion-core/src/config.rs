//! Configuration types for hybrid search.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, SearchError};

/// Per-call fusion parameters.
///
/// Weights need not sum to 1; only relative ordering matters for ranking.
/// They must be non-negative, finite, and not simultaneously zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionConfig {
    /// Weight applied to the vector path's reciprocal-rank term.
    #[serde(default = "default_vector_weight")]
    pub vector_weight: f32,

    /// Weight applied to the text path's reciprocal-rank term.
    #[serde(default = "default_text_weight")]
    pub text_weight: f32,

    /// RRF damping constant; larger values flatten the score distribution.
    #[serde(default = "default_rrf_k")]
    pub rrf_k: f32,

    /// Maximum number of fused results to return.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            vector_weight: default_vector_weight(),
            text_weight: default_text_weight(),
            rrf_k: default_rrf_k(),
            limit: default_limit(),
        }
    }
}

impl FusionConfig {
    /// Validate the weight and limit invariants.
    ///
    /// Called before any retrieval is issued; violations fail fast with
    /// `InvalidConfig`.
    pub fn validate(&self) -> Result<()> {
        if !self.vector_weight.is_finite() || self.vector_weight < 0.0 {
            return Err(SearchError::invalid_config(format!(
                "vector_weight must be a non-negative finite number, got {}",
                self.vector_weight
            )));
        }
        if !self.text_weight.is_finite() || self.text_weight < 0.0 {
            return Err(SearchError::invalid_config(format!(
                "text_weight must be a non-negative finite number, got {}",
                self.text_weight
            )));
        }
        if self.vector_weight == 0.0 && self.text_weight == 0.0 {
            // All scores would be zero and the ordering undefined.
            return Err(SearchError::invalid_config(
                "vector_weight and text_weight cannot both be zero",
            ));
        }
        if !self.rrf_k.is_finite() || self.rrf_k <= 0.0 {
            return Err(SearchError::invalid_config(format!(
                "rrf_k must be a positive finite number, got {}",
                self.rrf_k
            )));
        }
        if self.limit == 0 {
            return Err(SearchError::invalid_config("limit must be at least 1"));
        }
        Ok(())
    }
}

/// Retrieval scheduling parameters for the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Independent deadline for each retrieval path, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Floor on the per-path candidate fetch. Each path fetches
    /// `max(2 * limit, min_fetch)` so fusion has headroom beyond the final
    /// result count.
    #[serde(default = "default_min_fetch")]
    pub min_fetch: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            min_fetch: default_min_fetch(),
        }
    }
}

/// Top-level configuration file surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HybridConfig {
    /// Default fusion parameters; callers may override per search.
    #[serde(default)]
    pub fusion: FusionConfig,

    /// Retrieval scheduling parameters.
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl HybridConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| SearchError::config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load configuration from default paths.
    ///
    /// Tries the user config dir, then a local `hybrid-search.toml`, then
    /// falls back to built-in defaults.
    pub fn load_default() -> Result<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("hybrid-search").join("config.toml");
            if user_config.exists() {
                return Self::load(&user_config);
            }
        }

        let local_config = PathBuf::from("hybrid-search.toml");
        if local_config.exists() {
            return Self::load(&local_config);
        }

        Ok(Self::default())
    }
}

// Default value functions

fn default_vector_weight() -> f32 {
    0.7
}

fn default_text_weight() -> f32 {
    0.3
}

fn default_rrf_k() -> f32 {
    60.0
}

fn default_limit() -> usize {
    5
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_min_fetch() -> usize {
    20
}
