//! Fallback orchestration over routed providers

use super::chain::{AttemptRecord, ChainFailure, ChainState, FallbackChain};
use super::execution::is_chain_retryable;
use super::preferences::ModelPreferences;
use crate::config::{Config, FallbackConfig, RouteTarget, Validate};
use crate::core::providers::ProviderRegistry;
use crate::core::retry::{RetryExecutor, RetryPolicy};
use crate::core::router::{ComplexityTier, CostPriority, Route, RouteOptions, RouteSource, Router};
use crate::core::types::{
    ChatArgs, ChatMessage, ChatOptions, ChatResponse, RequestContext, Usage, last_user_content,
};
use crate::utils::error::{OrchestratorError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// Arguments for one logical completion
#[derive(Debug, Clone, Default)]
pub struct CompletionArgs {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub complexity: Option<ComplexityTier>,
    pub priority: Option<CostPriority>,
    pub options: ChatOptions,
    /// Per-call retry policy
    pub retry_policy: Option<RetryPolicy>,
}

impl CompletionArgs {
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

    pub fn with_complexity(mut self, complexity: ComplexityTier) -> Self {
        self.complexity = Some(complexity);
        self
    }

    pub fn with_priority(mut self, priority: CostPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    fn route_options(&self) -> RouteOptions {
        RouteOptions {
            provider: self.provider.clone(),
            model: self.model.clone(),
            complexity: self.complexity,
            priority: self.priority,
        }
    }
}

/// Completion result with fallback telemetry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackResponse {
    pub id: String,
    pub content: String,
    /// Model the upstream reports having served
    pub model: String,
    /// Model the route asked for
    pub routed_model: String,
    pub provider: String,
    pub usage: Usage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<ComplexityTier>,
    /// A route other than the first produced the response
    pub fallback_used: bool,
    /// Routes attempted, including the successful one
    pub fallback_attempts: usize,
    pub fallback_chain: Vec<AttemptRecord>,
}

/// Runs a completion across an ordered chain of routes
#[derive(Debug)]
pub struct FallbackOrchestrator {
    router: Arc<Router>,
    executor: RetryExecutor,
    enabled: bool,
    chain: Vec<RouteTarget>,
    preferences: ModelPreferences,
}

impl FallbackOrchestrator {
    pub fn new(router: Arc<Router>, executor: RetryExecutor, config: &FallbackConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| OrchestratorError::configuration("invalid_config", e))?;

        Ok(Self {
            router,
            executor,
            enabled: config.enabled,
            chain: config.chain.clone(),
            preferences: ModelPreferences::from_config(config),
        })
    }

    /// Router, executor and orchestrator from one configuration
    pub fn from_config(registry: Arc<ProviderRegistry>, config: &Config) -> Result<Self> {
        let router = Arc::new(Router::new(registry, &config.routing)?);
        Self::new(router, RetryExecutor::from_config(&config.retry), &config.fallback)
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn executor(&self) -> &RetryExecutor {
        &self.executor
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Ordered routes for a request whose last user message is `text`
    pub fn build_chain(&self, text: &str, args: &CompletionArgs) -> Result<Vec<Route>> {
        let options = args.route_options();

        if !self.enabled {
            return Ok(vec![self.router.route(text, &options)?]);
        }

        if !self.chain.is_empty() {
            return Ok(self.configured_chain());
        }

        let primary = self.router.route(text, &options)?;
        let tier = primary
            .complexity
            .unwrap_or_else(|| self.router.analyze_complexity(text));

        let mut routes = vec![primary];
        for provider in self.router.registry().configured() {
            if routes.iter().any(|r| r.provider_name() == provider.name()) {
                continue;
            }

            let model = self
                .preferences
                .preferred(provider.name(), tier)
                .filter(|model| provider.supports_model(model))
                .map(str::to_string)
                .or_else(|| provider.available_models().first().map(|m| m.id.clone()));

            let Some(model) = model else {
                continue;
            };

            let route = Route::new(provider, model, RouteSource::Preference).with_complexity(Some(tier));
            if !routes.iter().any(|r| r.same_target(&route)) {
                routes.push(route);
            }
        }

        Ok(routes)
    }

    fn configured_chain(&self) -> Vec<Route> {
        let mut routes: Vec<Route> = Vec::with_capacity(self.chain.len());
        for target in &self.chain {
            match self.router.resolve_route(target, RouteSource::Configured) {
                Ok(route) if routes.iter().any(|r| r.same_target(&route)) => {}
                Ok(route) => routes.push(route),
                Err(e) => warn!(
                    provider = %target.provider,
                    model = %target.model,
                    error = %e,
                    "Skipping invalid fallback chain entry"
                ),
            }
        }
        routes
    }

    /// Complete `messages`, advancing through the chain on retryable failures
    pub async fn complete_with_fallback(
        &self,
        messages: &[ChatMessage],
        args: &CompletionArgs,
        ctx: &RequestContext,
    ) -> Result<FallbackResponse> {
        let text = last_user_content(messages).unwrap_or_default();

        let routes = match self.build_chain(text, args) {
            Ok(routes) if routes.is_empty() => {
                return Err(OrchestratorError::ChainAborted(ChainFailure::new(
                    Vec::new(),
                    OrchestratorError::configuration(
                        "provider_not_configured",
                        "Fallback chain has no usable routes",
                    ),
                )));
            }
            Ok(routes) => routes,
            Err(e) => {
                return Err(OrchestratorError::ChainAborted(ChainFailure::new(Vec::new(), e)));
            }
        };

        info!(
            request_id = %ctx.request_id,
            routes = routes.len(),
            primary = %routes[0],
            "Starting completion"
        );

        let mut chain = FallbackChain::new(routes);
        let mut last_error = None;

        while let ChainState::Attempting(index) = chain.state() {
            let route = chain.routes()[index].clone();
            let started = Instant::now();
            let (result, retries) = self.attempt(&route, messages, args, ctx).await;
            let latency_ms = started.elapsed().as_millis() as u64;

            match result {
                Ok(response) => {
                    chain.record_success(AttemptRecord::succeeded(
                        route.provider_name(),
                        &route.model,
                        latency_ms,
                        retries,
                    ));
                    if index > 0 {
                        info!(route = %route, attempts = index + 1, "Fallback route succeeded");
                    }
                    return Ok(Self::envelope(response, &route, index, chain.attempts()));
                }
                Err(e) => {
                    let retryable = is_chain_retryable(&e);
                    let state = chain.record_failure(
                        AttemptRecord::failed(route.provider_name(), &route.model, latency_ms, &e, retries),
                        retryable,
                    );
                    if let ChainState::Advance(next) = state {
                        warn!(
                            route = %route,
                            code = e.code(),
                            next = %chain.routes()[next],
                            "Route failed, falling back"
                        );
                        chain.advance();
                    }
                    last_error = Some(e);
                }
            }
        }

        let state = chain.state();
        let last_error = last_error.unwrap_or_else(|| {
            OrchestratorError::configuration("provider_not_configured", "Fallback chain has no usable routes")
        });
        let failure = chain.into_failure(last_error);
        error!(request_id = %ctx.request_id, failure = %failure, "Completion failed");

        match state {
            ChainState::Exhausted => Err(OrchestratorError::ChainExhausted(failure)),
            _ => Err(OrchestratorError::ChainAborted(failure)),
        }
    }

    async fn attempt(
        &self,
        route: &Route,
        messages: &[ChatMessage],
        args: &CompletionArgs,
        ctx: &RequestContext,
    ) -> (Result<ChatResponse>, u32) {
        let chat_args = ChatArgs::new(route.model.clone()).with_options(args.options.clone());
        let chat_args = &chat_args;
        let provider = &route.provider;

        let (result, report) = self
            .executor
            .execute_with_report(route.provider_name(), ctx, args.retry_policy.as_ref(), |_| {
                let provider = Arc::clone(provider);
                async move { provider.chat_completion(messages, chat_args).await }
            })
            .await;

        (result, report.retries())
    }

    fn envelope(response: ChatResponse, route: &Route, index: usize, attempts: &[AttemptRecord]) -> FallbackResponse {
        FallbackResponse {
            id: response.id,
            content: response.content,
            model: if response.model.is_empty() {
                route.model.clone()
            } else {
                response.model
            },
            routed_model: route.model.clone(),
            provider: route.provider_name().to_string(),
            usage: response.usage,
            finish_reason: response.finish_reason,
            complexity: route.complexity,
            fallback_used: index > 0,
            fallback_attempts: index + 1,
            fallback_chain: attempts.to_vec(),
        }
    }
}
