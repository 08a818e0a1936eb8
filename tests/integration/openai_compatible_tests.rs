//! OpenAI-compatible provider against a mock upstream

#[cfg(test)]
mod tests {
    use crate::common::{chat_body, embedding_body, http_settings};
    use llm_orchestrator::core::types::{ChatArgs, EmbeddingOutput};
    use llm_orchestrator::{
        LLMProvider, OpenAICompatibleProvider, RequestContext, RetryExecutor, RetryPolicy,
        user_message,
    };
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn provider(server: &MockServer) -> OpenAICompatibleProvider {
        let settings = http_settings("openai", &server.uri(), &["gpt-4o-mini"]);
        OpenAICompatibleProvider::from_settings(&settings).unwrap()
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::default()
            .with_max_retries(3)
            .with_initial_delay(Duration::from_millis(10))
            .with_max_delay(Duration::from_millis(50))
            .without_jitter()
    }

    #[tokio::test]
    async fn test_chat_completion_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({ "model": "gpt-4o-mini", "temperature": 0.5, "max_tokens": 64 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("gpt-4o-mini", "Hello!")))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider(&server).await;
        let mut args = ChatArgs::new("gpt-4o-mini");
        args.options.temperature = Some(0.5);
        args.options.max_tokens = Some(64);

        let response = provider
            .chat_completion(&[user_message("Hi")], &args)
            .await
            .unwrap();

        assert_eq!(response.content, "Hello!");
        assert_eq!(response.id, "chatcmpl-test");
        assert_eq!(response.usage.total_tokens, 17);
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    }

    #[tokio::test]
    async fn test_rate_limit_carries_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("Retry-After", "7")
                    .set_body_json(json!({ "error": { "type": "rate_limit_exceeded", "message": "slow down" } })),
            )
            .mount(&server)
            .await;

        let err = provider(&server)
            .await
            .chat_completion(&[user_message("Hi")], &ChatArgs::new("gpt-4o-mini"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(429));
        assert_eq!(err.retry_after(), Some(7));
        assert_eq!(err.code(), "rate_limit");
        assert!(err.to_string().contains("slow down"));
    }

    #[tokio::test]
    async fn test_error_body_code_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": "context_length_exceeded", "message": "prompt too long" }
            })))
            .mount(&server)
            .await;

        let err = provider(&server)
            .await
            .chat_completion(&[user_message("Hi")], &ChatArgs::new("gpt-4o-mini"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert_eq!(err.upstream_code(), "context_length_exceeded");
        assert!(err.to_string().contains("prompt too long"));
    }

    #[tokio::test]
    async fn test_unknown_model_rejected_before_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = provider(&server)
            .await
            .chat_completion(&[user_message("Hi")], &ChatArgs::new("gpt-4o"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_model");
    }

    #[tokio::test]
    async fn test_executor_retries_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("gpt-4o-mini", "recovered")))
            .mount(&server)
            .await;

        let provider = provider(&server).await;
        let messages = vec![user_message("Hi")];
        let args = ChatArgs::new("gpt-4o-mini");
        let executor = RetryExecutor::new(fast_policy());

        let (result, report) = executor
            .execute_with_report("openai", &RequestContext::new(), None, |_| {
                let provider = &provider;
                let messages = &messages;
                let args = &args;
                async move { provider.chat_completion(messages, args).await }
            })
            .await;

        assert_eq!(result.unwrap().content, "recovered");
        assert_eq!(report.attempts, 3);
        assert_eq!(
            report.delays,
            vec![Duration::from_millis(10), Duration::from_millis(20)]
        );
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_retry_after_capped_by_max_delay() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("gpt-4o-mini", "ok")))
            .mount(&server)
            .await;

        let provider = provider(&server).await;
        let messages = vec![user_message("Hi")];
        let args = ChatArgs::new("gpt-4o-mini");
        let executor = RetryExecutor::new(fast_policy());

        let (result, report) = executor
            .execute_with_report("openai", &RequestContext::new(), None, |_| {
                let provider = &provider;
                let messages = &messages;
                let args = &args;
                async move { provider.chat_completion(messages, args).await }
            })
            .await;

        assert!(result.is_ok());
        assert_eq!(report.delays, vec![Duration::from_millis(50)]);
    }

    #[tokio::test]
    async fn test_embeddings_sorted_by_index() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(body_partial_json(json!({ "model": "text-embedding-3-small", "input": ["a", "b"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "data": [
                    { "index": 1, "embedding": [0.0, 1.0] },
                    { "index": 0, "embedding": [1.0, 0.0] }
                ]
            })))
            .mount(&server)
            .await;

        let mut settings = http_settings("openai", &server.uri(), &["text-embedding-3-small"]);
        settings.supports_embeddings = true;
        let provider = OpenAICompatibleProvider::from_settings(&settings).unwrap();

        let output = provider
            .generate_embeddings(&["a".to_string(), "b".to_string()], "text-embedding-3-small")
            .await
            .unwrap();
        assert_eq!(
            output,
            EmbeddingOutput::Batch(vec![vec![1.0, 0.0], vec![0.0, 1.0]])
        );
    }

    #[tokio::test]
    async fn test_embeddings_disabled_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(embedding_body(&[vec![0.0]])))
            .expect(0)
            .mount(&server)
            .await;

        let err = provider(&server)
            .await
            .generate_embeddings(&["a".to_string()], "gpt-4o-mini")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "not_supported");
    }

    #[tokio::test]
    async fn test_connection_lists_models() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .expect(1)
            .mount(&server)
            .await;

        assert!(provider(&server).await.test_connection().await.unwrap());
    }

    #[tokio::test]
    async fn test_connection_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid api key" })))
            .mount(&server)
            .await;

        let err = provider(&server).await.test_connection().await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("invalid api key"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let settings = http_settings("offline", "http://127.0.0.1:9", &["gpt-4o-mini"]);
        let provider = OpenAICompatibleProvider::from_settings(&settings).unwrap();

        let err = provider.test_connection().await.unwrap_err();
        assert!(matches!(err.code(), "connection_failed" | "timeout"));
        assert_eq!(err.provider(), "offline");
    }
}
