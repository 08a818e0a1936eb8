//! Preferred alternate model per provider and complexity tier

use crate::config::FallbackConfig;
use crate::core::router::ComplexityTier;
use std::collections::{BTreeMap, HashMap};

/// Provider → tier → model table used when deriving alternates
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPreferences {
    table: HashMap<String, BTreeMap<ComplexityTier, String>>,
}

impl Default for ModelPreferences {
    fn default() -> Self {
        let mut table = HashMap::new();
        for (provider, simple, medium, complex) in [
            ("openai", "gpt-4o-mini", "gpt-4o-mini", "gpt-4o"),
            (
                "anthropic",
                "claude-3-5-haiku-20241022",
                "claude-3-5-sonnet-20241022",
                "claude-3-5-sonnet-20241022",
            ),
            ("gemini", "gemini-1.5-flash", "gemini-1.5-flash", "gemini-1.5-pro"),
            (
                "mistral",
                "mistral-small-latest",
                "mistral-small-latest",
                "mistral-large-latest",
            ),
            (
                "groq",
                "llama-3.1-8b-instant",
                "llama-3.1-70b-versatile",
                "llama-3.1-70b-versatile",
            ),
        ] {
            let tiers = BTreeMap::from([
                (ComplexityTier::Simple, simple.to_string()),
                (ComplexityTier::Medium, medium.to_string()),
                (ComplexityTier::Complex, complex.to_string()),
            ]);
            table.insert(provider.to_string(), tiers);
        }
        Self { table }
    }
}

impl ModelPreferences {
    /// Built-in table with configured entries layered on top
    pub fn from_config(config: &FallbackConfig) -> Self {
        Self::default().with_overrides(&config.preferences)
    }

    pub fn with_overrides(mut self, overrides: &HashMap<String, BTreeMap<ComplexityTier, String>>) -> Self {
        for (provider, tiers) in overrides {
            let entry = self.table.entry(provider.clone()).or_default();
            for (tier, model) in tiers {
                entry.insert(*tier, model.clone());
            }
        }
        self
    }

    pub fn preferred(&self, provider: &str, tier: ComplexityTier) -> Option<&str> {
        self.table
            .get(provider)
            .and_then(|tiers| tiers.get(&tier))
            .map(String::as_str)
    }
}
