//! # llm-orchestrator
//!
//! Provider resilience layer for LLM backends. A chat request is routed to a
//! provider/model by prompt complexity and cost priority, executed with
//! bounded retry and backoff, and carried across an ordered fallback chain
//! until one route succeeds. Embeddings are generated in batches, cached per
//! text and ranked by cosine similarity.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llm_orchestrator::{CompletionArgs, Config, Orchestrator, RequestContext, user_message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/orchestrator.yaml").await?;
//!     let orchestrator = Orchestrator::new(config)?;
//!
//!     let response = orchestrator
//!         .complete(
//!             &[user_message("Summarize our refund policy")],
//!             &CompletionArgs::new(),
//!             &RequestContext::new(),
//!         )
//!         .await?;
//!
//!     println!("{} via {}/{}", response.content, response.provider, response.model);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

pub use config::Config;
pub use utils::error::{OrchestratorError, Result};

pub use core::embedding::{
    EmbeddingOptions, EmbeddingService, SimilarityMatch, cosine_similarity, find_most_similar,
};
pub use core::fallback::{AttemptRecord, CompletionArgs, FallbackOrchestrator, FallbackResponse};
pub use core::providers::{
    OpenAICompatibleProvider, ProviderError, ProviderFactories, ProviderRegistry, ScriptedProvider,
};
pub use core::retry::{RetryExecutor, RetryPolicy};
pub use core::router::{ComplexityTier, CostPriority, Route, Router};
pub use core::traits::LLMProvider;
pub use core::types::{
    ChatMessage, ChatOptions, ChatResponse, Embedding, MessageRole, ModelInfo, RequestContext,
    Usage, assistant_message, system_message, user_message,
};

use std::sync::Arc;
use tracing::info;

/// Providers, fallback orchestrator and embedding service built from one
/// configuration
#[derive(Debug)]
pub struct Orchestrator {
    config: Config,
    registry: Arc<ProviderRegistry>,
    fallback: FallbackOrchestrator,
    embeddings: EmbeddingService,
}

impl Orchestrator {
    /// Build with the default provider factories
    pub fn new(config: Config) -> Result<Self> {
        Self::with_factories(config, &ProviderFactories::with_defaults())
    }

    pub fn with_factories(config: Config, factories: &ProviderFactories) -> Result<Self> {
        config.validate()?;
        let registry = Arc::new(ProviderRegistry::from_settings(&config.providers, factories)?);
        Self::with_registry(config, registry)
    }

    /// Build over an existing registry
    pub fn with_registry(config: Config, registry: Arc<ProviderRegistry>) -> Result<Self> {
        let fallback = FallbackOrchestrator::from_config(registry.clone(), &config)?;
        let embeddings = EmbeddingService::from_config(registry.clone(), &config)?;

        info!(
            providers = registry.len(),
            configured = registry.configured().len(),
            fallback = config.fallback.enabled,
            "Orchestrator ready"
        );

        Ok(Self {
            config,
            registry,
            fallback,
            embeddings,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    pub fn router(&self) -> &Arc<Router> {
        self.fallback.router()
    }

    pub fn fallback(&self) -> &FallbackOrchestrator {
        &self.fallback
    }

    pub fn embeddings(&self) -> &EmbeddingService {
        &self.embeddings
    }

    /// Chat completion with routing, retry and fallback
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        args: &CompletionArgs,
        ctx: &RequestContext,
    ) -> Result<FallbackResponse> {
        self.fallback.complete_with_fallback(messages, args, ctx).await
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    /// Seconds since the Unix epoch
    pub build_time: &'static str,
    pub git_hash: &'static str,
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
