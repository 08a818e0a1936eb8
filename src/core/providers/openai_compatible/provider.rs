//! OpenAI-compatible provider implementation

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Method, Response};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use super::wire::{
    ChatCompletionRequest, ChatCompletionResponse, EmbeddingRequest, EmbeddingResponse,
};
use crate::config::ProviderSettings;
use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::LLMProvider;
use crate::core::types::{
    ChatArgs, ChatMessage, ChatResponse, EmbeddingOutput, ModelInfo, ProviderStatus,
};

/// Used when settings carry no base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Provider for any OpenAI-compatible HTTP API
#[derive(Debug, Clone)]
pub struct OpenAICompatibleProvider {
    name: String,
    base_url: String,
    api_key: Option<String>,
    headers: HashMap<String, String>,
    models: Vec<ModelInfo>,
    supports_embeddings: bool,
    client: Client,
}

impl OpenAICompatibleProvider {
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout))
            .build()
            .map_err(|e| ProviderError::configuration(&settings.name, e.to_string()))?;

        let base_url = settings
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            name: settings.name.clone(),
            base_url,
            api_key: settings.api_key.clone().filter(|k| !k.trim().is_empty()),
            headers: settings.headers.clone(),
            models: settings.resolved_models(),
            supports_embeddings: settings.supports_embeddings,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, &url);

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::from(e).with_provider(&self.name))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = parse_retry_after(response.headers());
        let body = response.text().await.unwrap_or_default();
        debug!(
            provider = %self.name,
            status = status.as_u16(),
            "Upstream returned error status"
        );
        Err(ProviderError::from_status(
            &self.name,
            status.as_u16(),
            &body,
            retry_after,
        ))
    }

    fn ensure_configured(&self) -> Result<(), ProviderError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(ProviderError::not_configured(&self.name, "API key not set"))
        }
    }
}

/// Seconds from a `Retry-After` header; HTTP-date values are ignored
pub fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    value
        .parse::<u64>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().filter(|s| *s >= 0.0).map(|s| s.ceil() as u64))
}

#[async_trait]
impl LLMProvider for OpenAICompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn available_models(&self) -> &[ModelInfo] {
        &self.models
    }

    fn supports_embeddings(&self) -> bool {
        self.supports_embeddings
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        args: &ChatArgs,
    ) -> Result<ChatResponse, ProviderError> {
        self.ensure_configured()?;
        if !self.supports_model(&args.model) {
            return Err(ProviderError::model_not_found(&self.name, &args.model));
        }

        let body = ChatCompletionRequest {
            model: &args.model,
            messages,
            options: &args.options,
        };
        let response = self
            .send(Method::POST, "/chat/completions", Some(&body))
            .await?;

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::response_parsing(&self.name, e.to_string()))?;

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            ProviderError::response_parsing(&self.name, "response contained no choices")
        })?;

        Ok(ChatResponse {
            id: parsed.id,
            model: parsed.model.unwrap_or_else(|| args.model.clone()),
            content: choice.message.content.unwrap_or_default(),
            usage: parsed.usage.unwrap_or_default(),
            finish_reason: choice.finish_reason,
        })
    }

    async fn generate_embeddings(
        &self,
        texts: &[String],
        model: &str,
    ) -> Result<EmbeddingOutput, ProviderError> {
        if !self.supports_embeddings {
            return Err(ProviderError::not_supported(&self.name, "embeddings"));
        }
        self.ensure_configured()?;

        let body = EmbeddingRequest {
            model,
            input: texts,
        };
        let response = self.send(Method::POST, "/embeddings", Some(&body)).await?;

        let mut parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::response_parsing(&self.name, e.to_string()))?;

        parsed.data.sort_by_key(|d| d.index);
        Ok(EmbeddingOutput::Batch(
            parsed.data.into_iter().map(|d| d.embedding).collect(),
        ))
    }

    async fn test_connection(&self) -> Result<bool, ProviderError> {
        self.ensure_configured()?;
        self.send::<()>(Method::GET, "/models", None).await?;
        Ok(true)
    }

    fn config_status(&self) -> ProviderStatus {
        ProviderStatus {
            name: self.name.clone(),
            configured: self.is_configured(),
            supports_embeddings: self.supports_embeddings,
            model_count: self.models.len(),
            base_url: Some(self.base_url.clone()),
            message: (!self.is_configured()).then(|| "API key not set".to_string()),
        }
    }
}
