//! Scripted provider
//!
//! In-memory provider that replays queued outcomes. Used by tests and dry runs
//! where no upstream should be contacted. With an empty queue it answers
//! successfully with deterministic content.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use crate::config::ProviderSettings;
use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::LLMProvider;
use crate::core::types::{
    ChatArgs, ChatMessage, ChatResponse, EmbeddingOutput, ModelInfo, Usage,
};

const DEFAULT_DIMENSION: usize = 8;

/// Provider replaying queued chat and embedding outcomes
#[derive(Debug)]
pub struct ScriptedProvider {
    name: String,
    models: Vec<ModelInfo>,
    configured: bool,
    supports_embeddings: bool,
    latency: Duration,
    chat_script: Mutex<VecDeque<Result<ChatResponse, ProviderError>>>,
    embedding_script: Mutex<VecDeque<Result<EmbeddingOutput, ProviderError>>>,
    chat_calls: AtomicU32,
    embedding_calls: AtomicU32,
    embedded_texts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    /// Configured provider with the given chat models
    pub fn new<I, S>(name: impl Into<String>, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let models = models
            .into_iter()
            .map(|id| ModelInfo::new(id, name.clone()))
            .collect();

        Self {
            name,
            models,
            configured: true,
            supports_embeddings: false,
            latency: Duration::ZERO,
            chat_script: Mutex::new(VecDeque::new()),
            embedding_script: Mutex::new(VecDeque::new()),
            chat_calls: AtomicU32::new(0),
            embedding_calls: AtomicU32::new(0),
            embedded_texts: Mutex::new(Vec::new()),
        }
    }

    pub fn from_settings(settings: &ProviderSettings) -> Self {
        let mut provider = Self::new(settings.name.clone(), Vec::<String>::new());
        provider.models = settings.resolved_models();
        provider.supports_embeddings = settings.supports_embeddings;
        provider
    }

    /// Report `is_configured() == false`
    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    /// Enable embeddings and add an embedding model
    pub fn with_embedding_model(mut self, id: impl Into<String>, dimension: usize) -> Self {
        self.supports_embeddings = true;
        self.models
            .push(ModelInfo::new(id, self.name.clone()).with_embedding_dimension(dimension));
        self
    }

    /// Replace the model list
    pub fn with_models(mut self, models: Vec<ModelInfo>) -> Self {
        self.models = models;
        self
    }

    /// Simulated upstream latency per call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn push_chat(&self, outcome: Result<ChatResponse, ProviderError>) {
        lock(&self.chat_script).push_back(outcome);
    }

    pub fn push_chat_error(&self, error: ProviderError) {
        self.push_chat(Err(error));
    }

    /// Queue the same error `times` times
    pub fn push_chat_errors(&self, error: ProviderError, times: usize) {
        for _ in 0..times {
            self.push_chat_error(error.clone());
        }
    }

    pub fn push_embedding(&self, outcome: Result<EmbeddingOutput, ProviderError>) {
        lock(&self.embedding_script).push_back(outcome);
    }

    pub fn chat_calls(&self) -> u32 {
        self.chat_calls.load(Ordering::SeqCst)
    }

    pub fn embedding_calls(&self) -> u32 {
        self.embedding_calls.load(Ordering::SeqCst)
    }

    /// Every text sent to `generate_embeddings`, in call order
    pub fn embedded_texts(&self) -> Vec<String> {
        lock(&self.embedded_texts).clone()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn dimension_for(&self, model: &str) -> usize {
        self.model_info(model)
            .and_then(|m| m.embedding_dimension)
            .unwrap_or(DEFAULT_DIMENSION)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Deterministic unit-free vector derived from the text bytes
pub fn synthetic_embedding(text: &str, dimension: usize) -> Vec<f32> {
    let digest = Sha256::digest(text.as_bytes());
    (0..dimension)
        .map(|i| digest[i % digest.len()] as f32 / 255.0 - 0.5)
        .collect()
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
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
        self.configured
    }

    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        args: &ChatArgs,
    ) -> Result<ChatResponse, ProviderError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        let scripted = lock(&self.chat_script).pop_front();
        match scripted {
            Some(outcome) => outcome,
            None => Ok(ChatResponse {
                id: format!("scripted-{}", self.chat_calls()),
                model: args.model.clone(),
                content: format!("{}:{} reply", self.name, args.model),
                usage: Usage::new(messages.len() as u32, 1),
                finish_reason: Some("stop".to_string()),
            }),
        }
    }

    async fn generate_embeddings(
        &self,
        texts: &[String],
        model: &str,
    ) -> Result<EmbeddingOutput, ProviderError> {
        if !self.supports_embeddings {
            return Err(ProviderError::not_supported(&self.name, "embeddings"));
        }

        self.embedding_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.embedded_texts).extend(texts.iter().cloned());
        self.simulate_latency().await;

        let scripted = lock(&self.embedding_script).pop_front();
        match scripted {
            Some(outcome) => outcome,
            None => {
                let dimension = self.dimension_for(model);
                Ok(EmbeddingOutput::Batch(
                    texts
                        .iter()
                        .map(|t| synthetic_embedding(t, dimension))
                        .collect(),
                ))
            }
        }
    }

    async fn test_connection(&self) -> Result<bool, ProviderError> {
        Ok(self.configured)
    }
}
