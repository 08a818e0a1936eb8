//! Embedding configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Embedding service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider used when the caller names none
    #[serde(default)]
    pub provider: Option<String>,
    /// Default embedding model per provider
    #[serde(default)]
    pub default_models: HashMap<String, String>,
    #[serde(default = "default_embedding_cache_ttl")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_embedding_cache_max_entries")]
    pub cache_max_entries: usize,
    #[serde(default = "default_embedding_batch_size")]
    pub batch_size: usize,
    /// Pause between batches, in milliseconds
    #[serde(default = "default_embedding_batch_delay_ms")]
    pub batch_delay_ms: u64,
    /// Maximum characters per input text
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: None,
            default_models: HashMap::new(),
            cache_ttl_secs: default_embedding_cache_ttl(),
            cache_max_entries: default_embedding_cache_max_entries(),
            batch_size: default_embedding_batch_size(),
            batch_delay_ms: default_embedding_batch_delay_ms(),
            max_text_length: default_max_text_length(),
        }
    }
}
