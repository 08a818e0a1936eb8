//! Fallback chains end to end

#[cfg(test)]
mod tests {
    use crate::common::{chat_body, http_settings, scripted_registry};
    use llm_orchestrator::config::{RetryConfig, RouteTarget};
    use llm_orchestrator::{
        CompletionArgs, Config, Orchestrator, OrchestratorError, ProviderError, RequestContext,
        ScriptedProvider, user_message,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_retry(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            initial_delay_ms: 10,
            max_delay_ms: 50,
            jitter: false,
            ..Default::default()
        }
    }

    async fn failing_server(status: u16, expected: u64) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(status))
            .expect(expected)
            .mount(&server)
            .await;
        server
    }

    async fn healthy_server(model: &str, content: &str, expected: u64) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(model, content)))
            .expect(expected)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_server_errors_fall_back_to_next_provider() {
        let primary = failing_server(500, 2).await;
        let secondary = healthy_server("claude-3-5-sonnet-20241022", "from anthropic", 1).await;

        let config = Config {
            retry: fast_retry(1),
            providers: vec![
                http_settings("openai", &primary.uri(), &["gpt-4o"]),
                http_settings("anthropic", &secondary.uri(), &["claude-3-5-sonnet-20241022"]),
            ],
            fallback: llm_orchestrator::config::FallbackConfig {
                chain: vec![
                    RouteTarget::new("openai", "gpt-4o"),
                    RouteTarget::new("anthropic", "claude-3-5-sonnet-20241022"),
                ],
                ..Default::default()
            },
            ..Default::default()
        };
        let orchestrator = Orchestrator::new(config).unwrap();

        let response = orchestrator
            .complete(&[user_message("Hi")], &CompletionArgs::new(), &RequestContext::new())
            .await
            .unwrap();

        assert_eq!(response.content, "from anthropic");
        assert_eq!(response.provider, "anthropic");
        assert!(response.fallback_used);
        assert_eq!(response.fallback_attempts, 2);
        assert_eq!(response.usage.total_tokens, 17);
        assert_eq!(response.fallback_chain[0].retry_attempts, 1);
        assert_eq!(response.fallback_chain[0].error_code.as_deref(), Some("api_error"));
    }

    #[tokio::test]
    async fn test_client_error_does_not_fall_back() {
        let primary = failing_server(401, 1).await;
        let secondary = healthy_server("claude-3-5-sonnet-20241022", "unused", 0).await;

        let mut config = Config {
            retry: fast_retry(3),
            providers: vec![
                http_settings("openai", &primary.uri(), &["gpt-4o"]),
                http_settings("anthropic", &secondary.uri(), &["claude-3-5-sonnet-20241022"]),
            ],
            ..Default::default()
        };
        config.fallback.chain = vec![
            RouteTarget::new("openai", "gpt-4o"),
            RouteTarget::new("anthropic", "claude-3-5-sonnet-20241022"),
        ];
        let orchestrator = Orchestrator::new(config).unwrap();

        let err = orchestrator
            .complete(&[user_message("Hi")], &CompletionArgs::new(), &RequestContext::new())
            .await
            .unwrap_err();

        assert!(matches!(err, OrchestratorError::ChainAborted(_)));
        let attempts = err.attempts().unwrap();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].provider, "openai");
    }

    #[tokio::test]
    async fn test_derived_chain_from_routing_table() {
        let primary = failing_server(503, 1).await;
        let secondary = healthy_server("claude-3-5-haiku-20241022", "haiku answer", 1).await;

        let config = Config {
            retry: fast_retry(0),
            providers: vec![
                http_settings("openai", &primary.uri(), &["gpt-4o-mini", "gpt-4o"]),
                http_settings(
                    "anthropic",
                    &secondary.uri(),
                    &["claude-3-5-haiku-20241022", "claude-3-5-sonnet-20241022"],
                ),
            ],
            ..Default::default()
        };
        let orchestrator = Orchestrator::new(config).unwrap();

        let response = orchestrator
            .complete(
                &[user_message("Reset my password")],
                &CompletionArgs::new(),
                &RequestContext::new(),
            )
            .await
            .unwrap();

        assert_eq!(response.fallback_chain[0].model, "gpt-4o-mini");
        assert_eq!(response.model, "claude-3-5-haiku-20241022");
        assert_eq!(response.content, "haiku answer");
        assert_eq!(
            response.complexity,
            Some(llm_orchestrator::ComplexityTier::Simple)
        );
    }

    #[tokio::test]
    async fn test_exhausted_chain_reports_every_attempt() {
        let openai = Arc::new(ScriptedProvider::new("openai", ["gpt-4o"]));
        let mistral = Arc::new(ScriptedProvider::new("mistral", ["mistral-large-latest"]));
        openai.push_chat_error(ProviderError::rate_limit("openai", None));
        mistral.push_chat_error(ProviderError::timeout("mistral", "read timed out"));

        let mut config = Config {
            retry: fast_retry(0),
            ..Default::default()
        };
        config.fallback.chain = vec![
            RouteTarget::new("openai", "gpt-4o"),
            RouteTarget::new("mistral", "mistral-large-latest"),
        ];
        let orchestrator =
            Orchestrator::with_registry(config, scripted_registry(&[openai, mistral])).unwrap();

        let err = orchestrator
            .complete(&[user_message("Hi")], &CompletionArgs::new(), &RequestContext::new())
            .await
            .unwrap_err();

        assert_eq!(err.code(), "chain_exhausted");
        let attempts = serde_json::to_value(err.attempts().unwrap()).unwrap();
        assert_eq!(attempts[0]["provider"], "openai");
        assert_eq!(attempts[0]["success"], false);
        assert_eq!(attempts[1]["provider"], "mistral");
        assert_eq!(attempts[1]["error_code"], "timeout");
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_stops_slow_chain() {
        let slow = Arc::new(
            ScriptedProvider::new("openai", ["gpt-4o"]).with_latency(Duration::from_secs(10)),
        );
        let backup = Arc::new(ScriptedProvider::new("anthropic", ["claude-3-5-sonnet-20241022"]));

        let mut config = Config::default();
        config.fallback.chain = vec![
            RouteTarget::new("openai", "gpt-4o"),
            RouteTarget::new("anthropic", "claude-3-5-sonnet-20241022"),
        ];
        let orchestrator =
            Orchestrator::with_registry(config, scripted_registry(&[slow.clone(), backup.clone()]))
                .unwrap();

        let ctx = RequestContext::new().with_timeout(Duration::from_millis(100));
        let err = orchestrator
            .complete(&[user_message("Hi")], &CompletionArgs::new(), &ctx)
            .await
            .unwrap_err();

        assert!(matches!(err, OrchestratorError::ChainAborted(_)));
        assert_eq!(err.attempts().unwrap()[0].error_code.as_deref(), Some("cancelled"));
        assert_eq!(slow.chat_calls(), 1);
        assert_eq!(backup.chat_calls(), 0);
    }
}
