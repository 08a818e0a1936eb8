//! Error types for the orchestration layer

use crate::core::fallback::ChainFailure;
use crate::core::providers::unified_provider::ProviderError;
use thiserror::Error;

/// Result type alias for the orchestration layer
pub type Result<T> = std::result::Result<T, OrchestratorError>;

/// Main error type for the orchestration layer
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// Timeout, connection or DNS failure
    #[error("Transient network error from {provider}: {message}")]
    TransientNetwork { provider: String, message: String },

    /// Upstream answered 429
    #[error("Rate limited by {provider}: {message}")]
    RateLimited {
        provider: String,
        message: String,
        retry_after: Option<u64>,
    },

    /// Upstream answered 5xx
    #[error("Upstream server error from {provider} (status {status}): {message}")]
    UpstreamServerError {
        provider: String,
        status: u16,
        message: String,
    },

    /// Upstream answered 4xx other than 429
    #[error("Upstream client error from {provider} (status {status}, {code}): {message}")]
    UpstreamClientError {
        provider: String,
        status: u16,
        code: String,
        message: String,
    },

    /// Unknown provider or model, provider not configured, invalid routing table
    #[error("Configuration error ({code}): {message}")]
    Configuration { code: String, message: String },

    /// Every retry of a retryable failure was spent
    #[error("Retries exhausted for {provider} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        provider: String,
        attempts: u32,
        last_error: ProviderError,
    },

    /// All fallback routes failed
    #[error("All fallback routes failed: {0}")]
    ChainExhausted(ChainFailure),

    /// A route failed with a terminal error and the chain stopped
    #[error("Fallback chain aborted: {0}")]
    ChainAborted(ChainFailure),

    #[error("Provider {provider} does not support embeddings")]
    EmbeddingUnsupported { provider: String },

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Validation error: {0}")]
    Validation(String),

    /// Request deadline passed or the cancellation token fired
    ///
    /// `last_error` is the failure the interrupted retry loop was recovering from.
    #[error("Request cancelled: {reason}{}", last_error_suffix(.last_error))]
    Cancelled {
        reason: String,
        last_error: Option<ProviderError>,
    },

    /// Provider answered 2xx with a payload we could not use
    #[error("Malformed response from {provider}: {message}")]
    UpstreamResponse { provider: String, message: String },

    /// Provider failure without a more specific classification
    #[error("Provider error: {0}")]
    Provider(ProviderError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

fn last_error_suffix(last_error: &Option<ProviderError>) -> String {
    last_error
        .as_ref()
        .map(|e| format!(" (last error: {})", e))
        .unwrap_or_default()
}
