//! Configuration validation
//!
//! Every section is checked against its structural invariants before any
//! component is built from it.

use super::models::*;
use crate::core::router::{ComplexityTier, CostPriority};
use std::collections::HashSet;
use tracing::debug;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_delay_ms < self.initial_delay_ms {
            return Err("Retry max delay must not be less than initial delay".to_string());
        }

        if self.exponential_base < 1.0 {
            return Err("Retry exponential base must be at least 1.0".to_string());
        }

        if !(0.0..=1.0).contains(&self.jitter_max) {
            return Err("Retry jitter fraction must be between 0.0 and 1.0".to_string());
        }

        if let Some(code) = self
            .retryable_status_codes
            .iter()
            .find(|c| !(100..=599).contains(*c))
        {
            return Err(format!("Invalid retryable status code: {}", code));
        }

        Ok(())
    }
}

impl Validate for RoutingConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating routing configuration");

        if self.simple_threshold >= self.medium_threshold {
            return Err(format!(
                "Simple threshold ({}) must be lower than medium threshold ({})",
                self.simple_threshold, self.medium_threshold
            ));
        }

        if self.default_model.is_some() && self.default_provider.is_none() {
            return Err("Default model requires a default provider".to_string());
        }

        if let Some(rules) = &self.model_routing_rules {
            validate_routing_rules(rules)?;
        }

        Ok(())
    }
}

/// Every tier needs a `balanced` entry and no entry may be blank
pub fn validate_routing_rules(rules: &RoutingRules) -> Result<(), String> {
    for tier in ComplexityTier::ALL {
        let entries = rules
            .get(&tier)
            .ok_or_else(|| format!("Routing table has no entry for tier '{}'", tier))?;

        if !entries.contains_key(&CostPriority::Balanced) {
            return Err(format!(
                "Routing table tier '{}' has no 'balanced' entry",
                tier
            ));
        }

        for (priority, target) in entries {
            validate_target(target)
                .map_err(|e| format!("Routing table entry {}/{}: {}", tier, priority, e))?;
        }
    }

    Ok(())
}

fn validate_target(target: &RouteTarget) -> Result<(), String> {
    if target.provider.trim().is_empty() {
        return Err("provider must not be empty".to_string());
    }
    if target.model.trim().is_empty() {
        return Err("model must not be empty".to_string());
    }
    Ok(())
}

impl Validate for FallbackConfig {
    fn validate(&self) -> Result<(), String> {
        for (index, target) in self.chain.iter().enumerate() {
            validate_target(target).map_err(|e| format!("Fallback chain entry {}: {}", index, e))?;
        }

        for (provider, tiers) in &self.preferences {
            if tiers.values().any(|model| model.trim().is_empty()) {
                return Err(format!(
                    "Fallback preferences for '{}' contain an empty model",
                    provider
                ));
            }
        }

        Ok(())
    }
}

impl Validate for EmbeddingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("Embedding batch size must be greater than 0".to_string());
        }

        if self.max_text_length == 0 {
            return Err("Embedding max text length must be greater than 0".to_string());
        }

        if self.cache_max_entries == 0 {
            return Err("Embedding cache max entries must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for ProviderSettings {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Provider name must not be empty".to_string());
        }

        if self.provider_type.trim().is_empty() {
            return Err(format!("Provider '{}' has an empty provider_type", self.name));
        }

        if self.timeout == 0 {
            return Err(format!(
                "Provider '{}' timeout must be greater than 0",
                self.name
            ));
        }

        let mut seen = HashSet::new();
        for model in &self.models {
            if model.id.trim().is_empty() {
                return Err(format!("Provider '{}' lists a model without id", self.name));
            }
            if !seen.insert(model.id.as_str()) {
                return Err(format!(
                    "Provider '{}' lists model '{}' twice",
                    self.name, model.id
                ));
            }
        }

        Ok(())
    }
}

impl Validate for [ProviderSettings] {
    fn validate(&self) -> Result<(), String> {
        let mut names = HashSet::new();
        for provider in self {
            provider.validate()?;
            if !names.insert(provider.name.as_str()) {
                return Err(format!("Duplicate provider name: {}", provider.name));
            }
        }
        Ok(())
    }
}
