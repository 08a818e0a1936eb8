//! Route selection

use crate::config::{RouteTarget, RoutingConfig, Validate};
use crate::core::providers::ProviderRegistry;
use crate::core::traits::LLMProvider;
use crate::utils::error::{OrchestratorError, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::complexity::{ComplexityAnalyzer, ComplexityTier};
use super::route::{Route, RouteSource};
use super::routing_table::{CostPriority, RoutingTable};

/// Per-request routing hints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteOptions {
    /// Forced provider; only honored together with `model`
    pub provider: Option<String>,
    /// Forced model; only honored together with `provider`
    pub model: Option<String>,
    /// Skip analysis and use this tier
    pub complexity: Option<ComplexityTier>,
    pub priority: Option<CostPriority>,
}

impl RouteOptions {
    pub fn forced(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: Some(provider.into()),
            model: Some(model.into()),
            ..Default::default()
        }
    }

    pub fn with_complexity(mut self, complexity: ComplexityTier) -> Self {
        self.complexity = Some(complexity);
        self
    }

    pub fn with_priority(mut self, priority: CostPriority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Complexity-based router
///
/// Immutable after construction; safe to share between requests.
#[derive(Debug)]
pub struct Router {
    registry: Arc<ProviderRegistry>,
    analyzer: ComplexityAnalyzer,
    table: RoutingTable,
    cost_optimization_enabled: bool,
    default_provider: Option<String>,
    default_model: Option<String>,
}

impl Router {
    /// Build a router, validating the routing configuration first
    pub fn new(registry: Arc<ProviderRegistry>, config: &RoutingConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| OrchestratorError::configuration("invalid_routing_table", e))?;

        Ok(Self {
            registry,
            analyzer: ComplexityAnalyzer::from_config(config),
            table: RoutingTable::from_config(config)?,
            cost_optimization_enabled: config.cost_optimization_enabled,
            default_provider: config.default_provider.clone(),
            default_model: config.default_model.clone(),
        })
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    pub fn analyzer(&self) -> &ComplexityAnalyzer {
        &self.analyzer
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    pub fn analyze_complexity(&self, text: &str) -> ComplexityTier {
        self.analyzer.analyze(text)
    }

    /// `cost` when cost optimization is enabled, `balanced` otherwise
    pub fn default_priority(&self) -> CostPriority {
        if self.cost_optimization_enabled {
            CostPriority::Cost
        } else {
            CostPriority::Balanced
        }
    }

    /// Select the route for `text`
    pub fn route(&self, text: &str, options: &RouteOptions) -> Result<Route> {
        if let (Some(provider), Some(model)) = (&options.provider, &options.model) {
            let route = self.forced_route(provider, model)?;
            debug!(route = %route, "Using forced route");
            return Ok(route
                .with_complexity(options.complexity)
                .with_priority(options.priority));
        }

        let complexity = options
            .complexity
            .unwrap_or_else(|| self.analyzer.analyze(text));
        let priority = options.priority.unwrap_or_else(|| self.default_priority());

        if let Some(target) = self.table.lookup(complexity, priority) {
            match self.resolve_target(target) {
                Some(provider) => {
                    let route = Route::new(provider, target.model.clone(), RouteSource::Table)
                        .with_complexity(Some(complexity))
                        .with_priority(Some(priority));
                    info!(
                        route = %route,
                        complexity = %complexity,
                        priority = %priority,
                        "Route selected"
                    );
                    return Ok(route);
                }
                None => warn!(
                    provider = %target.provider,
                    model = %target.model,
                    "Routing table entry unavailable, using default route"
                ),
            }
        }

        let route = self
            .default_route()?
            .with_complexity(Some(complexity))
            .with_priority(Some(priority));
        info!(route = %route, complexity = %complexity, "Default route selected");
        Ok(route)
    }

    /// Configured default provider/model, else the first configured provider's
    /// first model
    pub fn default_route(&self) -> Result<Route> {
        if let Some(provider_name) = &self.default_provider {
            match self.usable_provider(provider_name) {
                Some(provider) => {
                    let model = match &self.default_model {
                        Some(model) if provider.supports_model(model) => Some(model.clone()),
                        Some(model) => {
                            warn!(provider = %provider_name, model = %model, "Default model unavailable");
                            None
                        }
                        None => provider.available_models().first().map(|m| m.id.clone()),
                    };
                    if let Some(model) = model {
                        return Ok(Route::new(provider, model, RouteSource::Default));
                    }
                }
                None => warn!(provider = %provider_name, "Default provider unavailable"),
            }
        }

        self.registry
            .configured()
            .into_iter()
            .find_map(|provider| {
                let model = provider.available_models().first()?.id.clone();
                Some(Route::new(provider, model, RouteSource::FirstAvailable))
            })
            .ok_or_else(|| {
                OrchestratorError::configuration(
                    "provider_not_configured",
                    "No configured provider with an available model",
                )
            })
    }

    /// Validate an explicit provider/model pair
    pub fn forced_route(&self, provider: &str, model: &str) -> Result<Route> {
        let provider = self.registry.resolve(provider)?;
        self.check_route(&provider, model)?;
        Ok(Route::new(provider, model, RouteSource::Forced))
    }

    /// Same checks as a forced route, with the given source
    pub fn resolve_route(&self, target: &RouteTarget, source: RouteSource) -> Result<Route> {
        let provider = self.registry.resolve(&target.provider)?;
        self.check_route(&provider, &target.model)?;
        Ok(Route::new(provider, target.model.clone(), source))
    }

    fn check_route(&self, provider: &Arc<dyn LLMProvider>, model: &str) -> Result<()> {
        if !provider.is_configured() {
            return Err(OrchestratorError::configuration(
                "provider_not_configured",
                format!("Provider '{}' is not configured", provider.name()),
            ));
        }
        if !provider.supports_model(model) {
            return Err(OrchestratorError::configuration(
                "invalid_model",
                format!(
                    "Model '{}' is not available for provider '{}'",
                    model,
                    provider.name()
                ),
            ));
        }
        Ok(())
    }

    fn usable_provider(&self, name: &str) -> Option<Arc<dyn LLMProvider>> {
        self.registry.get(name).filter(|p| p.is_configured())
    }

    fn resolve_target(&self, target: &RouteTarget) -> Option<Arc<dyn LLMProvider>> {
        self.usable_provider(&target.provider)
            .filter(|p| p.supports_model(&target.model))
    }
}
