//! Core LLM Provider trait definitions
//!
//! Defines the capability contract every backend satisfies. The orchestration
//! layer only ever sees `Arc<dyn LLMProvider>`.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::{
    ChatArgs, ChatMessage, ChatResponse, EmbeddingOutput, ModelInfo, ProviderStatus,
};

/// Unified LLM Provider interface
///
/// Implementations must be cheap to share between in-flight requests: every
/// method takes `&self` and nothing in the orchestration layer mutates a
/// provider after registration.
#[async_trait]
pub trait LLMProvider: Send + Sync + Debug {
    // ==================== Basic Metadata ====================

    /// Unique provider name used for routing and logging
    fn name(&self) -> &str;

    /// Known models, in preference order
    fn available_models(&self) -> &[ModelInfo];

    /// Static embedding capability flag
    ///
    /// A provider may list embedding-looking models and still not expose the
    /// endpoint, so this is never inferred from the model list.
    fn supports_embeddings(&self) -> bool {
        false
    }

    /// Credentials and endpoint present
    fn is_configured(&self) -> bool;

    // ==================== Core Functions ====================

    /// One chat completion call, no retries
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        args: &ChatArgs,
    ) -> Result<ChatResponse, ProviderError>;

    /// One embedding call for a validated batch, no retries
    async fn generate_embeddings(
        &self,
        _texts: &[String],
        _model: &str,
    ) -> Result<EmbeddingOutput, ProviderError> {
        Err(ProviderError::not_supported(self.name(), "embeddings"))
    }

    /// Check the upstream is reachable with the configured credentials
    async fn test_connection(&self) -> Result<bool, ProviderError>;

    // ==================== Model Metadata ====================

    fn supports_model(&self, model: &str) -> bool {
        self.available_models().iter().any(|m| m.id == model)
    }

    fn model_info(&self, model: &str) -> Option<&ModelInfo> {
        self.available_models().iter().find(|m| m.id == model)
    }

    /// Cost in USD of a call with the given token counts
    fn estimate_cost(
        &self,
        model: &str,
        input_tokens: u32,
        output_tokens: u32,
    ) -> Result<f64, ProviderError> {
        self.model_info(model)
            .map(|info| info.estimate_cost(input_tokens, output_tokens))
            .ok_or_else(|| ProviderError::model_not_found(self.name(), model))
    }

    fn max_tokens(&self, model: &str) -> Result<u32, ProviderError> {
        self.model_info(model)
            .map(|info| info.max_tokens)
            .ok_or_else(|| ProviderError::model_not_found(self.name(), model))
    }

    fn config_status(&self) -> ProviderStatus {
        ProviderStatus {
            name: self.name().to_string(),
            configured: self.is_configured(),
            supports_embeddings: self.supports_embeddings(),
            model_count: self.available_models().len(),
            base_url: None,
            message: None,
        }
    }
}
