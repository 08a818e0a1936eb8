//! Provider Registry
//!
//! Name → provider map built once at startup from factories keyed by provider
//! type. Read-only afterwards; lookups hand out `Arc` clones.

use super::openai_compatible::OpenAICompatibleProvider;
use super::unified_provider::ProviderError;
use crate::config::ProviderSettings;
use crate::core::traits::LLMProvider;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Builds one provider from its settings
pub type ProviderFactory =
    Arc<dyn Fn(&ProviderSettings) -> Result<Arc<dyn LLMProvider>, ProviderError> + Send + Sync>;

/// Factories keyed by `provider_type`
#[derive(Clone, Default)]
pub struct ProviderFactories {
    factories: HashMap<String, ProviderFactory>,
}

impl ProviderFactories {
    /// Empty factory set
    pub fn new() -> Self {
        Self::default()
    }

    /// Factories for the provider types shipped with the crate
    pub fn with_defaults() -> Self {
        let mut factories = Self::new();
        let openai: ProviderFactory = Arc::new(|settings: &ProviderSettings| {
            let provider = OpenAICompatibleProvider::from_settings(settings)?;
            Ok(Arc::new(provider) as Arc<dyn LLMProvider>)
        });
        factories.register("openai_compatible", openai.clone());
        factories.register("openai", openai);
        factories
    }

    pub fn register(&mut self, provider_type: impl Into<String>, factory: ProviderFactory) {
        self.factories.insert(provider_type.into(), factory);
    }

    pub fn contains(&self, provider_type: &str) -> bool {
        self.factories.contains_key(provider_type)
    }

    /// Build a provider, failing with `provider_class_not_found` for unknown types
    pub fn build(&self, settings: &ProviderSettings) -> Result<Arc<dyn LLMProvider>, ProviderError> {
        let factory = self
            .factories
            .get(&settings.provider_type)
            .ok_or_else(|| ProviderError::provider_class_not_found(&settings.provider_type))?;
        factory(settings)
    }
}

impl std::fmt::Debug for ProviderFactories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderFactories")
            .field("types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Provider Registry
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn LLMProvider>>,
    /// Registration order, used wherever "first configured provider" matters
    order: Vec<String>,
}

impl ProviderRegistry {
    /// Create new provider registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every enabled provider from settings
    pub fn from_settings(
        settings: &[ProviderSettings],
        factories: &ProviderFactories,
    ) -> Result<Self, ProviderError> {
        let mut registry = Self::new();

        for entry in settings {
            if !entry.enabled {
                debug!(provider = %entry.name, "Skipping disabled provider");
                continue;
            }

            let provider = factories.build(entry)?;
            if !provider.is_configured() {
                warn!(provider = %entry.name, "Provider registered without complete configuration");
            }
            registry.register(provider);
        }

        info!(
            count = registry.len(),
            providers = ?registry.names(),
            "Provider registry initialized"
        );
        Ok(registry)
    }

    /// Register a provider; a provider with the same name is replaced in place
    pub fn register(&mut self, provider: Arc<dyn LLMProvider>) {
        let name = provider.name().to_string();
        if !self.providers.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.providers.insert(name, provider);
    }

    /// Get provider by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn LLMProvider>> {
        self.providers.get(name).cloned()
    }

    /// Get provider by name, failing with `invalid_provider`
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn LLMProvider>, ProviderError> {
        self.get(name)
            .ok_or_else(|| ProviderError::unknown_provider(name))
    }

    /// Provider names in registration order
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// All providers in registration order
    pub fn all(&self) -> Vec<Arc<dyn LLMProvider>> {
        self.order
            .iter()
            .filter_map(|name| self.providers.get(name).cloned())
            .collect()
    }

    /// Providers reporting complete configuration, in registration order
    pub fn configured(&self) -> Vec<Arc<dyn LLMProvider>> {
        self.all()
            .into_iter()
            .filter(|p| p.is_configured())
            .collect()
    }

    /// Find providers supporting a specific model
    pub fn find_supporting_model(&self, model: &str) -> Vec<Arc<dyn LLMProvider>> {
        self.all()
            .into_iter()
            .filter(|p| p.supports_model(model))
            .collect()
    }

    /// Check if provider is registered
    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Get provider count
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("provider_count", &self.providers.len())
            .field("providers", &self.order)
            .finish()
    }
}
