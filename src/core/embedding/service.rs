//! Embedding generation over registered providers

use super::cache::{CacheStats, EmbeddingCache};
use super::validation::{validate_batch_size, validate_texts};
use crate::config::{Config, EmbeddingConfig, Validate};
use crate::core::providers::ProviderRegistry;
use crate::core::retry::RetryExecutor;
use crate::core::traits::LLMProvider;
use crate::core::types::{Embedding, RequestContext, looks_like_embedding_model};
use crate::utils::error::{OrchestratorError, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Optional provider and model for an embedding call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingOptions {
    pub provider: Option<String>,
    pub model: Option<String>,
}

impl EmbeddingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Generates, batches and caches embedding vectors
#[derive(Debug)]
pub struct EmbeddingService {
    registry: Arc<ProviderRegistry>,
    executor: RetryExecutor,
    config: EmbeddingConfig,
    cache: EmbeddingCache,
}

impl EmbeddingService {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        executor: RetryExecutor,
        config: EmbeddingConfig,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| OrchestratorError::configuration("invalid_config", e))?;

        Ok(Self {
            registry,
            executor,
            cache: EmbeddingCache::from_config(&config),
            config,
        })
    }

    pub fn from_config(registry: Arc<ProviderRegistry>, config: &Config) -> Result<Self> {
        Self::new(
            registry,
            RetryExecutor::from_config(&config.retry),
            config.embedding.clone(),
        )
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Provider and model an embedding call would use
    pub fn resolve(&self, options: &EmbeddingOptions) -> Result<(Arc<dyn LLMProvider>, String)> {
        let provider = self.resolve_provider(options.provider.as_deref())?;
        let model = match &options.model {
            Some(model) if provider.supports_model(model) => model.clone(),
            Some(model) => {
                return Err(OrchestratorError::configuration(
                    "invalid_model",
                    format!(
                        "Model '{}' is not available for provider '{}'",
                        model,
                        provider.name()
                    ),
                ));
            }
            None => self.default_model(provider.as_ref())?,
        };
        Ok((provider, model))
    }

    fn resolve_provider(&self, name: Option<&str>) -> Result<Arc<dyn LLMProvider>> {
        let provider = match name.or(self.config.provider.as_deref()) {
            Some(name) => self.registry.resolve(name)?,
            None => self
                .registry
                .configured()
                .into_iter()
                .find(|p| p.supports_embeddings())
                .ok_or_else(|| {
                    OrchestratorError::configuration(
                        "provider_not_configured",
                        "No configured provider supports embeddings",
                    )
                })?,
        };

        if !provider.is_configured() {
            return Err(OrchestratorError::configuration(
                "provider_not_configured",
                format!("Provider '{}' is not configured", provider.name()),
            ));
        }
        if !provider.supports_embeddings() {
            return Err(OrchestratorError::embedding_unsupported(provider.name()));
        }
        Ok(provider)
    }

    fn default_model(&self, provider: &dyn LLMProvider) -> Result<String> {
        if let Some(model) = self.config.default_models.get(provider.name()) {
            if !provider.supports_model(model) {
                return Err(OrchestratorError::configuration(
                    "invalid_model",
                    format!(
                        "Default embedding model '{}' is not available for provider '{}'",
                        model,
                        provider.name()
                    ),
                ));
            }
            return Ok(model.clone());
        }

        let models = provider.available_models();
        models
            .iter()
            .find(|m| m.is_embedding_model())
            .or_else(|| models.iter().find(|m| looks_like_embedding_model(&m.id)))
            .map(|m| m.id.clone())
            .ok_or_else(|| {
                OrchestratorError::configuration(
                    "invalid_model",
                    format!("Provider '{}' has no embedding model", provider.name()),
                )
            })
    }

    /// One vector per input text
    pub async fn generate(
        &self,
        texts: &[String],
        options: &EmbeddingOptions,
        ctx: &RequestContext,
    ) -> Result<Vec<Embedding>> {
        let (provider, model) = self.resolve(options)?;
        self.generate_with(provider, &model, texts, ctx).await
    }

    pub async fn generate_one(
        &self,
        text: &str,
        options: &EmbeddingOptions,
        ctx: &RequestContext,
    ) -> Result<Embedding> {
        let (provider, model) = self.resolve(options)?;
        let mut vectors = self
            .generate_with(provider.clone(), &model, &[text.to_string()], ctx)
            .await?;
        vectors.pop().ok_or_else(|| {
            OrchestratorError::upstream_response(provider.name(), "No embedding returned")
        })
    }

    /// Sequential chunks of `batch_size` (configured default when `None`),
    /// pausing between chunks. The first failed chunk fails the whole call.
    pub async fn generate_batched(
        &self,
        texts: &[String],
        batch_size: Option<usize>,
        options: &EmbeddingOptions,
        ctx: &RequestContext,
    ) -> Result<Vec<Embedding>> {
        let batch_size = batch_size.unwrap_or(self.config.batch_size);
        validate_batch_size(batch_size)?;
        validate_texts(texts, self.config.max_text_length)?;

        let (provider, model) = self.resolve(options)?;
        let delay = Duration::from_millis(self.config.batch_delay_ms);
        let batches = texts.len().div_ceil(batch_size);
        let mut vectors = Vec::with_capacity(texts.len());

        for (index, chunk) in texts.chunks(batch_size).enumerate() {
            if index > 0 && !delay.is_zero() {
                ctx.guard(tokio::time::sleep(delay)).await?;
            }
            debug!(
                provider = provider.name(),
                batch = index + 1,
                batches,
                size = chunk.len(),
                "Embedding batch"
            );
            let batch = self
                .generate_with(provider.clone(), &model, chunk, ctx)
                .await?;
            vectors.extend(batch);
        }

        info!(
            provider = provider.name(),
            model = %model,
            texts = texts.len(),
            batches,
            "Batched embeddings generated"
        );
        Ok(vectors)
    }

    /// Cached vector for `text`, generating and storing it on a miss
    pub async fn generate_cached(
        &self,
        text: &str,
        options: &EmbeddingOptions,
        ctx: &RequestContext,
    ) -> Result<Embedding> {
        let (provider, model) = self.resolve(options)?;
        let key = EmbeddingCache::key(text, provider.name(), &model);

        if let Some(vector) = self.cache.get(&key) {
            debug!(provider = provider.name(), model = %model, "Embedding cache hit");
            return Ok(vector);
        }

        let mut vectors = self
            .generate_with(provider.clone(), &model, &[text.to_string()], ctx)
            .await?;
        let vector = vectors.pop().ok_or_else(|| {
            OrchestratorError::upstream_response(provider.name(), "No embedding returned")
        })?;

        self.cache.insert(key, vector.clone());
        Ok(vector)
    }

    async fn generate_with(
        &self,
        provider: Arc<dyn LLMProvider>,
        model: &str,
        texts: &[String],
        ctx: &RequestContext,
    ) -> Result<Vec<Embedding>> {
        validate_texts(texts, self.config.max_text_length)?;

        let provider_ref = &provider;
        let output = self
            .executor
            .execute(provider.name(), ctx, |_| {
                let provider = Arc::clone(provider_ref);
                async move { provider.generate_embeddings(texts, model).await }
            })
            .await?;

        let vectors = output.into_vectors();
        if vectors.len() != texts.len() {
            return Err(OrchestratorError::upstream_response(
                provider.name(),
                format!(
                    "Expected {} embeddings, received {}",
                    texts.len(),
                    vectors.len()
                ),
            ));
        }

        debug!(
            provider = provider.name(),
            model,
            count = vectors.len(),
            dimension = vectors.first().map(Vec::len).unwrap_or_default(),
            "Embeddings generated"
        );
        Ok(vectors)
    }
}
