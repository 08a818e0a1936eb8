//! Provider configuration

use super::*;
use crate::core::types::ModelInfo;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Settings a provider factory builds one provider from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Provider name, unique across the registry
    pub name: String,
    /// Factory key (openai_compatible, scripted, ...)
    #[serde(default = "default_provider_type")]
    pub provider_type: String,
    /// API key
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL, e.g. `https://api.openai.com/v1`
    #[serde(default)]
    pub base_url: Option<String>,
    /// Known models, in preference order
    #[serde(default)]
    pub models: Vec<ModelInfo>,
    /// Whether the provider exposes an embeddings endpoint
    #[serde(default)]
    pub supports_embeddings: bool,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Whether provider is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ProviderSettings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider_type: default_provider_type(),
            api_key: None,
            base_url: None,
            models: Vec::new(),
            supports_embeddings: false,
            timeout: default_timeout(),
            headers: HashMap::new(),
            enabled: true,
        }
    }

    /// Model entries with the provider name filled in
    pub fn resolved_models(&self) -> Vec<ModelInfo> {
        self.models
            .iter()
            .cloned()
            .map(|mut model| {
                if model.provider.is_empty() {
                    model.provider = self.name.clone();
                }
                if model.name.is_empty() {
                    model.name = model.id.clone();
                }
                model
            })
            .collect()
    }
}
