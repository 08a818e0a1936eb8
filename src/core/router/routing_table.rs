//! Complexity tier × cost priority routing table

use crate::config::validation::validate_routing_rules;
use crate::config::{RouteTarget, RoutingConfig, RoutingRules};
use crate::utils::error::{OrchestratorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::complexity::ComplexityTier;

/// Caller or configuration preference among models of one tier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CostPriority {
    Cost,
    Balanced,
    Quality,
}

impl CostPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostPriority::Cost => "cost",
            CostPriority::Balanced => "balanced",
            CostPriority::Quality => "quality",
        }
    }
}

impl fmt::Display for CostPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CostPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cost" => Ok(CostPriority::Cost),
            "balanced" => Ok(CostPriority::Balanced),
            "quality" => Ok(CostPriority::Quality),
            other => Err(format!("unknown cost priority: {}", other)),
        }
    }
}

/// Validated routing table
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingTable {
    rules: RoutingRules,
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

impl RoutingTable {
    /// Validate and wrap a rule set
    pub fn new(rules: RoutingRules) -> Result<Self> {
        validate_routing_rules(&rules)
            .map_err(|e| OrchestratorError::configuration("invalid_routing_table", e))?;
        Ok(Self { rules })
    }

    /// Configured rules, or the built-in table
    pub fn from_config(config: &RoutingConfig) -> Result<Self> {
        match &config.model_routing_rules {
            Some(rules) => Self::new(rules.clone()),
            None => Ok(Self::default()),
        }
    }

    /// Entry for `priority`, falling back to the tier's `balanced` entry
    pub fn lookup(&self, tier: ComplexityTier, priority: CostPriority) -> Option<&RouteTarget> {
        let entries = self.rules.get(&tier)?;
        entries
            .get(&priority)
            .or_else(|| entries.get(&CostPriority::Balanced))
    }

    pub fn rules(&self) -> &RoutingRules {
        &self.rules
    }
}

fn default_rules() -> RoutingRules {
    let tier = |entries: [(CostPriority, &str, &str); 3]| {
        entries
            .into_iter()
            .map(|(priority, provider, model)| (priority, RouteTarget::new(provider, model)))
            .collect::<BTreeMap<_, _>>()
    };

    let mut rules = RoutingRules::new();
    rules.insert(
        ComplexityTier::Simple,
        tier([
            (CostPriority::Cost, "openai", "gpt-4o-mini"),
            (CostPriority::Balanced, "openai", "gpt-4o-mini"),
            (CostPriority::Quality, "anthropic", "claude-3-5-haiku-20241022"),
        ]),
    );
    rules.insert(
        ComplexityTier::Medium,
        tier([
            (CostPriority::Cost, "openai", "gpt-4o-mini"),
            (CostPriority::Balanced, "openai", "gpt-4o"),
            (CostPriority::Quality, "anthropic", "claude-3-5-sonnet-20241022"),
        ]),
    );
    rules.insert(
        ComplexityTier::Complex,
        tier([
            (CostPriority::Cost, "openai", "gpt-4o"),
            (CostPriority::Balanced, "anthropic", "claude-3-5-sonnet-20241022"),
            (CostPriority::Quality, "anthropic", "claude-3-opus-20240229"),
        ]),
    );
    rules
}
