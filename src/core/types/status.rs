//! Provider status reporting

use serde::{Deserialize, Serialize};

/// Snapshot of a provider's configuration, as reported by `config_status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub name: String,
    pub configured: bool,
    pub supports_embeddings: bool,
    pub model_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// What is missing when `configured` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
