//! Resolved routes

use crate::config::RouteTarget;
use crate::core::traits::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::complexity::ComplexityTier;
use super::routing_table::CostPriority;

/// How a route was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    /// Caller named provider and model
    Forced,
    /// Routing table entry
    Table,
    /// Configured default provider/model
    Default,
    /// First configured provider and its first model
    FirstAvailable,
    /// Explicit fallback chain entry
    Configured,
    /// Per-provider preference for an alternate
    Preference,
}

/// A (provider, model) pair ready to be attempted
#[derive(Clone)]
pub struct Route {
    pub provider: Arc<dyn LLMProvider>,
    pub model: String,
    pub complexity: Option<ComplexityTier>,
    pub priority: Option<CostPriority>,
    pub source: RouteSource,
}

impl Route {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>, source: RouteSource) -> Self {
        Self {
            provider,
            model: model.into(),
            complexity: None,
            priority: None,
            source,
        }
    }

    pub fn with_complexity(mut self, complexity: Option<ComplexityTier>) -> Self {
        self.complexity = complexity;
        self
    }

    pub fn with_priority(mut self, priority: Option<CostPriority>) -> Self {
        self.priority = priority;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn target(&self) -> RouteTarget {
        RouteTarget::new(self.provider.name(), self.model.clone())
    }

    /// Same provider and model
    pub fn same_target(&self, other: &Route) -> bool {
        self.provider_name() == other.provider_name() && self.model == other.model
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("complexity", &self.complexity)
            .field("priority", &self.priority)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider.name(), self.model)
    }
}
