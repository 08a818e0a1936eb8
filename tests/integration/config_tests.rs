//! Configuration loading into a working orchestrator

#[cfg(test)]
mod tests {
    use crate::common::chat_body;
    use llm_orchestrator::config::InMemoryConfigStore;
    use llm_orchestrator::{
        CompletionArgs, ComplexityTier, Config, CostPriority, Orchestrator, RequestContext,
        user_message,
    };
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_yaml_file_drives_routing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("local-large", "done")))
            .mount(&server)
            .await;

        let yaml = format!(
            r#"
retry:
  max_retries: 1
  initial_delay_ms: 10
  max_delay_ms: 20

routing:
  cost_optimization_enabled: true
  model_routing_rules:
    simple:
      balanced: {{ provider: local, model: local-small }}
    medium:
      balanced: {{ provider: local, model: local-small }}
    complex:
      balanced: {{ provider: local, model: local-small }}
      cost: {{ provider: local, model: local-large }}

providers:
  - name: local
    api_key: test-key
    base_url: {}
    models:
      - id: local-small
      - id: local-large
"#,
            server.uri()
        );

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        let config = Config::from_file(file.path()).await.unwrap();
        let orchestrator = Orchestrator::new(config).unwrap();

        assert_eq!(orchestrator.router().default_priority(), CostPriority::Cost);

        let response = orchestrator
            .complete(
                &[user_message("Explain the trade-offs between the two storage engines")],
                &CompletionArgs::new(),
                &RequestContext::new(),
            )
            .await
            .unwrap();
        assert_eq!(response.model, "local-large");
        assert_eq!(response.complexity, Some(ComplexityTier::Complex));
        assert!(!response.fallback_used);
    }

    #[test]
    fn test_incomplete_routing_table_rejected() {
        let yaml = r#"
routing:
  model_routing_rules:
    simple:
      cost: { provider: openai, model: gpt-4o-mini }
"#;
        let err = crate::assert_err!(Config::from_yaml_str(yaml));
        assert_eq!(err.code(), "invalid_config");
        assert!(err.to_string().contains("routing"));
    }

    #[test]
    fn test_store_overrides_defaults() {
        let store = InMemoryConfigStore::new()
            .with("max_retries", json!(5))
            .with("fallback_enabled", json!(false))
            .with("embedding_provider", json!("openai"))
            .with(
                "fallback_chain",
                json!([{ "provider": "openai", "model": "gpt-4o" }]),
            );

        let config = crate::assert_ok!(Config::from_store(&store));
        assert_eq!(config.retry.max_retries, 5);
        assert!(!config.fallback.enabled);
        assert_eq!(config.embedding.provider.as_deref(), Some("openai"));
        assert_eq!(config.fallback.chain[0].model, "gpt-4o");
        assert_eq!(config.retry.initial_delay_ms, 1000);
    }

    #[test]
    fn test_duplicate_providers_rejected() {
        let yaml = r#"
providers:
  - name: openai
    api_key: a
  - name: openai
    api_key: b
"#;
        let err = Config::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn test_example_config_is_valid() {
        let config =
            Config::from_yaml_str(include_str!("../../config/orchestrator.yaml.example")).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.providers[1].headers["anthropic-version"], "2023-06-01");
        assert_eq!(
            config.embedding.default_models.get("openai").map(String::as_str),
            Some("text-embedding-3-small")
        );
    }
}
