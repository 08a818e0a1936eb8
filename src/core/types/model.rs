//! Model information types

use serde::{Deserialize, Serialize};

/// Model information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model ID, scoped to its provider
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Provider name
    #[serde(default)]
    pub provider: String,
    /// Maximum token limit
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Input price (per 1K tokens)
    #[serde(default)]
    pub input_cost_per_1k_tokens: f64,
    /// Output price (per 1K tokens)
    #[serde(default)]
    pub output_cost_per_1k_tokens: f64,
    /// Vector dimension; `None` for chat models
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_dimension: Option<usize>,
}

fn default_max_tokens() -> u32 {
    4096
}

impl ModelInfo {
    /// Create a chat model entry with default limits and zero cost
    pub fn new(id: impl Into<String>, provider: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            provider: provider.into(),
            max_tokens: default_max_tokens(),
            input_cost_per_1k_tokens: 0.0,
            output_cost_per_1k_tokens: 0.0,
            embedding_dimension: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_costs(mut self, input_per_1k: f64, output_per_1k: f64) -> Self {
        self.input_cost_per_1k_tokens = input_per_1k;
        self.output_cost_per_1k_tokens = output_per_1k;
        self
    }

    pub fn with_embedding_dimension(mut self, dimension: usize) -> Self {
        self.embedding_dimension = Some(dimension);
        self
    }

    pub fn is_embedding_model(&self) -> bool {
        self.embedding_dimension.is_some()
    }

    /// Cost in USD for the given token counts
    pub fn estimate_cost(&self, input_tokens: u32, output_tokens: u32) -> f64 {
        (input_tokens as f64 / 1000.0) * self.input_cost_per_1k_tokens
            + (output_tokens as f64 / 1000.0) * self.output_cost_per_1k_tokens
    }
}

/// Name-based guess for models without embedding metadata
pub fn looks_like_embedding_model(id: &str) -> bool {
    id.contains("embedding") || id.ends_with("ada-002")
}
