//! Embedding service over HTTP

#[cfg(test)]
mod tests {
    use crate::common::{embedding_body, http_settings};
    use llm_orchestrator::config::EmbeddingConfig;
    use llm_orchestrator::{
        Config, EmbeddingOptions, Orchestrator, RequestContext, find_most_similar,
    };
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn orchestrator(server: &MockServer) -> Orchestrator {
        let mut settings = http_settings(
            "openai",
            &server.uri(),
            &["gpt-4o-mini", "text-embedding-3-small"],
        );
        settings.supports_embeddings = true;

        let config = Config {
            providers: vec![settings],
            embedding: EmbeddingConfig {
                batch_delay_ms: 5,
                ..Default::default()
            },
            ..Default::default()
        };
        Orchestrator::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_cached_embedding_hits_upstream_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(body_partial_json(serde_json::json!({ "model": "text-embedding-3-small" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(embedding_body(&[vec![0.6, 0.8]])))
            .expect(1)
            .mount(&server)
            .await;

        let orchestrator = orchestrator(&server);
        let service = orchestrator.embeddings();
        let ctx = RequestContext::new();

        let first = service
            .generate_cached("refund policy", &EmbeddingOptions::new(), &ctx)
            .await
            .unwrap();
        let second = service
            .generate_cached("refund policy", &EmbeddingOptions::new(), &ctx)
            .await
            .unwrap();

        assert_eq!(first, vec![0.6, 0.8]);
        assert_eq!(first, second);
        assert_eq!(service.stats().hits, 1);
    }

    #[tokio::test]
    async fn test_batches_become_separate_requests() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(body_partial_json(serde_json::json!({ "input": ["a", "b"] })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(embedding_body(&[vec![1.0, 0.0], vec![0.0, 1.0]])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(body_partial_json(serde_json::json!({ "input": ["c"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(embedding_body(&[vec![0.7, 0.7]])))
            .expect(1)
            .mount(&server)
            .await;

        let orchestrator = orchestrator(&server);
        let texts: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();

        let vectors = orchestrator
            .embeddings()
            .generate_batched(&texts, Some(2), &EmbeddingOptions::new(), &RequestContext::new())
            .await
            .unwrap();
        assert_eq!(vectors.len(), 3);

        let matches = find_most_similar(&[1.0, 0.1], &vectors, 2);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].index, 0);
        assert_eq!(matches[1].index, 2);
    }

    #[tokio::test]
    async fn test_upstream_failure_fails_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "code": "invalid_input", "message": "input too long" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let orchestrator = orchestrator(&server);
        let err = orchestrator
            .embeddings()
            .generate(&["x".to_string()], &EmbeddingOptions::new(), &RequestContext::new())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert_eq!(err.code(), "invalid_input");
    }
}
