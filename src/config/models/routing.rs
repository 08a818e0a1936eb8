//! Routing configuration

use super::*;
use crate::core::router::{ComplexityTier, CostPriority};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A (provider, model) pair named in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTarget {
    pub provider: String,
    pub model: String,
}

impl RouteTarget {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
        }
    }
}

/// Complexity tier × cost priority table
pub type RoutingRules = BTreeMap<ComplexityTier, BTreeMap<CostPriority, RouteTarget>>;

/// Router configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Prefer the cheapest model of a tier when the caller gives no priority
    #[serde(default)]
    pub cost_optimization_enabled: bool,
    #[serde(default)]
    pub default_provider: Option<String>,
    #[serde(default)]
    pub default_model: Option<String>,
    /// Word count at or below which a request may be `simple`
    #[serde(default = "default_simple_threshold")]
    pub simple_threshold: usize,
    /// Word count at or below which a request may be `medium`
    #[serde(default = "default_medium_threshold")]
    pub medium_threshold: usize,
    /// Replaces the built-in routing table when set
    #[serde(default)]
    pub model_routing_rules: Option<RoutingRules>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            cost_optimization_enabled: false,
            default_provider: None,
            default_model: None,
            simple_threshold: default_simple_threshold(),
            medium_threshold: default_medium_threshold(),
            model_routing_rules: None,
        }
    }
}
