//! Configuration management for the orchestrator
//!
//! Configuration comes from a YAML file, from `ORCHESTRATOR_*` environment
//! variables, or from the host's key-value store. Whatever the source, it is
//! validated before any component is built from it.

pub mod models;
pub mod store;
pub mod validation;

pub use models::*;
pub use store::{ConfigStore, EnvConfigStore, InMemoryConfigStore};
pub use validation::Validate;

use crate::utils::error::{OrchestratorError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "ORCHESTRATOR";

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub providers: Vec<ProviderSettings>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            OrchestratorError::configuration(
                "config_file",
                format!("Failed to read config file: {}", e),
            )
        })?;

        let config = Self::from_yaml_str(&content)?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| {
            OrchestratorError::configuration("config_file", format!("Failed to parse config: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `ORCHESTRATOR_*` environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by the host key-value store
    pub fn from_store(store: &dyn ConfigStore) -> Result<Self> {
        let mut config = Self::default();
        config.apply_store(store)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `ORCHESTRATOR_*` environment overrides in place
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_store(&EnvConfigStore::new(ENV_PREFIX))
    }

    /// Overwrite every field whose key is present in `store`
    pub fn apply_store(&mut self, store: &dyn ConfigStore) -> Result<()> {
        let retry = &mut self.retry;
        read_key(store, "max_retries", &mut retry.max_retries)?;
        read_key(store, "initial_delay_ms", &mut retry.initial_delay_ms)?;
        read_key(store, "max_delay_ms", &mut retry.max_delay_ms)?;
        read_key(store, "exponential_base", &mut retry.exponential_base)?;
        read_key(store, "jitter", &mut retry.jitter)?;
        read_key(store, "jitter_max", &mut retry.jitter_max)?;
        read_key(store, "retryable_status_codes", &mut retry.retryable_status_codes)?;
        read_key(store, "retryable_errors", &mut retry.retryable_errors)?;

        let routing = &mut self.routing;
        read_key(
            store,
            "cost_optimization_enabled",
            &mut routing.cost_optimization_enabled,
        )?;
        read_key(store, "default_provider", &mut routing.default_provider)?;
        read_key(store, "default_model", &mut routing.default_model)?;
        read_key(store, "simple_threshold", &mut routing.simple_threshold)?;
        read_key(store, "medium_threshold", &mut routing.medium_threshold)?;
        read_key(store, "model_routing_rules", &mut routing.model_routing_rules)?;

        read_key(store, "fallback_enabled", &mut self.fallback.enabled)?;
        read_key(store, "fallback_chain", &mut self.fallback.chain)?;
        read_key(store, "fallback_preferences", &mut self.fallback.preferences)?;

        let embedding = &mut self.embedding;
        read_key(store, "embedding_provider", &mut embedding.provider)?;
        read_key(store, "embedding_models", &mut embedding.default_models)?;
        read_key(store, "embedding_cache_ttl_secs", &mut embedding.cache_ttl_secs)?;
        read_key(
            store,
            "embedding_cache_max_entries",
            &mut embedding.cache_max_entries,
        )?;
        read_key(store, "embedding_batch_size", &mut embedding.batch_size)?;
        read_key(store, "embedding_batch_delay_ms", &mut embedding.batch_delay_ms)?;
        read_key(
            store,
            "embedding_max_text_length",
            &mut embedding.max_text_length,
        )?;

        read_key(store, "providers", &mut self.providers)?;
        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.retry.validate().map_err(|e| section_error("retry", e))?;
        self.routing
            .validate()
            .map_err(|e| section_error("routing", e))?;
        self.fallback
            .validate()
            .map_err(|e| section_error("fallback", e))?;
        self.embedding
            .validate()
            .map_err(|e| section_error("embedding", e))?;
        self.providers
            .as_slice()
            .validate()
            .map_err(|e| section_error("providers", e))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn section_error(section: &str, message: String) -> OrchestratorError {
    OrchestratorError::configuration("invalid_config", format!("{} config error: {}", section, message))
}

fn read_key<T: DeserializeOwned>(store: &dyn ConfigStore, key: &str, target: &mut T) -> Result<()> {
    if let Some(value) = store.get(key) {
        *target = serde_json::from_value(value).map_err(|e| {
            OrchestratorError::configuration(
                "invalid_config",
                format!("Invalid value for '{}': {}", key, e),
            )
        })?;
        debug!(key, "Applied configuration override");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::router::{ComplexityTier, CostPriority};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_config_from_file() {
        let config_content = r#"
retry:
  max_retries: 2
  initial_delay_ms: 500
  jitter: false

routing:
  cost_optimization_enabled: true
  default_provider: openai
  default_model: gpt-4o-mini

fallback:
  chain:
    - provider: openai
      model: gpt-4o
    - provider: anthropic
      model: claude-3-5-sonnet-20241022

providers:
  - name: openai
    api_key: test-key
    base_url: https://api.openai.com/v1
    supports_embeddings: true
    models:
      - id: gpt-4o
      - id: gpt-4o-mini
      - id: text-embedding-3-small
        embedding_dimension: 1536
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let config = Config::from_file(temp_file.path()).await.unwrap();

        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.retry.max_delay_ms, 60_000);
        assert!(!config.retry.jitter);
        assert!(config.routing.cost_optimization_enabled);
        assert_eq!(config.fallback.chain.len(), 2);
        assert_eq!(config.providers[0].provider_type, "openai_compatible");
        assert_eq!(config.providers[0].models.len(), 3);
        assert_eq!(config.embedding.cache_ttl_secs, 86_400);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = Config::from_file("/nonexistent/orchestrator.yaml")
            .await
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.fallback.enabled);
        assert_eq!(config.routing.simple_threshold, 50);
    }

    #[test]
    fn test_invalid_yaml_rejected() {
        let err = Config::from_yaml_str("routing:\n  simple_threshold: 300\n").unwrap_err();
        assert!(err.to_string().contains("routing config error"));
    }

    #[test]
    fn test_from_store() {
        let store = InMemoryConfigStore::new()
            .with("max_retries", 5)
            .with("jitter", false)
            .with("fallback_enabled", false)
            .with("default_provider", "anthropic")
            .with("default_model", "claude-3-haiku-20240307")
            .with("embedding_cache_ttl_secs", 60)
            .with("embedding_batch_delay_ms", 250)
            .with("embedding_max_text_length", 2000)
            .with(
                "fallback_chain",
                serde_json::json!([{"provider": "openai", "model": "gpt-4o"}]),
            );

        let config = Config::from_store(&store).unwrap();
        assert_eq!(config.retry.max_retries, 5);
        assert!(!config.retry.jitter);
        assert!(!config.fallback.enabled);
        assert_eq!(config.routing.default_provider.as_deref(), Some("anthropic"));
        assert_eq!(config.embedding.cache_ttl_secs, 60);
        assert_eq!(config.embedding.batch_delay_ms, 250);
        assert_eq!(config.embedding.max_text_length, 2000);
        assert_eq!(config.fallback.chain[0].model, "gpt-4o");
    }

    #[test]
    fn test_store_routing_rules() {
        let rules = serde_json::json!({
            "simple": {"balanced": {"provider": "openai", "model": "gpt-4o-mini"}},
            "medium": {"balanced": {"provider": "openai", "model": "gpt-4o-mini"}},
            "complex": {
                "balanced": {"provider": "openai", "model": "gpt-4o"},
                "quality": {"provider": "anthropic", "model": "claude-3-opus-20240229"}
            }
        });
        let store = InMemoryConfigStore::new().with("model_routing_rules", rules);

        let config = Config::from_store(&store).unwrap();
        let table = config.routing.model_routing_rules.unwrap();
        assert_eq!(
            table[&ComplexityTier::Complex][&CostPriority::Quality].provider,
            "anthropic"
        );
    }

    #[test]
    fn test_store_type_mismatch() {
        let store = InMemoryConfigStore::new().with("max_retries", "many");
        let err = Config::from_store(&store).unwrap_err();
        assert!(err.to_string().contains("max_retries"));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = Config::default();
        let yaml = config.to_yaml().unwrap();
        let parsed = Config::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
