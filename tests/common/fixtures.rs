//! Test fixtures and data factories

use llm_orchestrator::config::ProviderSettings;
use llm_orchestrator::{ModelInfo, ProviderRegistry, ScriptedProvider};
use serde_json::{Value, json};
use std::sync::Arc;

/// Settings for an OpenAI-compatible provider served at `base_url`
pub fn http_settings(name: &str, base_url: &str, models: &[&str]) -> ProviderSettings {
    let mut settings = ProviderSettings::new(name);
    settings.base_url = Some(base_url.to_string());
    settings.api_key = Some("test-key".to_string());
    settings.timeout = 5;
    settings.models = models.iter().map(|id| ModelInfo::new(*id, "")).collect();
    settings
}

/// Registry of scripted providers, in the given order
pub fn scripted_registry(providers: &[Arc<ScriptedProvider>]) -> Arc<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();
    for provider in providers {
        registry.register(provider.clone());
    }
    Arc::new(registry)
}

/// `/chat/completions` success body
pub fn chat_body(model: &str, content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": model,
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17 }
    })
}

/// `/embeddings` success body, one entry per vector
pub fn embedding_body(vectors: &[Vec<f32>]) -> Value {
    let data: Vec<Value> = vectors
        .iter()
        .enumerate()
        .map(|(index, embedding)| json!({ "object": "embedding", "index": index, "embedding": embedding }))
        .collect();
    json!({ "object": "list", "data": data, "model": "text-embedding-3-small" })
}
