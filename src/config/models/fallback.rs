//! Fallback configuration

use super::*;
use crate::core::router::ComplexityTier;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Fallback configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// When false, each request gets exactly one route
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Explicit ordered chain; derived from the router when empty
    #[serde(default)]
    pub chain: Vec<RouteTarget>,
    /// Per-provider preferred model for each complexity tier, merged over
    /// the built-in table
    #[serde(default)]
    pub preferences: HashMap<String, BTreeMap<ComplexityTier, String>>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chain: Vec::new(),
            preferences: HashMap::new(),
        }
    }
}
