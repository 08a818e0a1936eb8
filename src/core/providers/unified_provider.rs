//! Unified Provider Error Handling
//!
//! Single error type returned by every implementation of the provider
//! capability contract.
//!
//! | Variant | Code | HTTP Status | Retry class |
//! |------|------|------------|--------|
//! | Authentication | `authentication_error` | 401 | terminal |
//! | RateLimit | `rate_limit` | 429 | retryable (honors `Retry-After`) |
//! | ModelNotFound | `invalid_model` | - | configuration |
//! | InvalidRequest | `invalid_request` | 400 | terminal |
//! | Network | `connection_failed` | - | retryable |
//! | Timeout | `timeout` | - | retryable |
//! | ProviderUnavailable | `transient` | - | retryable |
//! | NotConfigured | `provider_not_configured` | - | configuration |
//! | UnknownProvider | `invalid_provider` | - | configuration |
//! | ProviderClassNotFound | `provider_class_not_found` | - | configuration |
//! | ApiError | `api_error` | any | by status |
//! | Cancelled | `cancelled` | - | terminal |
//!
//! "Structured" failures (those carrying a status code) go through status
//! classification in the retry executor; the rest are hard errors classified by
//! code and message.

use serde_json::Value;

/// Unified provider error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("Authentication failed for {provider}: {message}")]
    Authentication { provider: String, message: String },

    #[error("Rate limit exceeded for {provider}: {message}")]
    RateLimit {
        provider: String,
        message: String,
        /// Seconds requested by the upstream `Retry-After` header
        retry_after: Option<u64>,
    },

    #[error("Model '{model}' not available for {provider}")]
    ModelNotFound { provider: String, model: String },

    #[error("Invalid request for {provider}: {message}")]
    InvalidRequest { provider: String, message: String },

    #[error("Network error for {provider}: {message}")]
    Network { provider: String, message: String },

    #[error("Timeout for {provider}: {message}")]
    Timeout { provider: String, message: String },

    #[error("Provider {provider} is unavailable: {message}")]
    ProviderUnavailable { provider: String, message: String },

    #[error("Provider {provider} is not configured: {message}")]
    NotConfigured { provider: String, message: String },

    #[error("Unknown provider: {provider}")]
    UnknownProvider { provider: String },

    #[error("No provider implementation registered for type '{provider_type}'")]
    ProviderClassNotFound { provider_type: String },

    #[error("Feature '{feature}' not supported by {provider}")]
    NotSupported { provider: String, feature: String },

    #[error("Configuration error for {provider}: {message}")]
    Configuration { provider: String, message: String },

    #[error("Serialization error for {provider}: {message}")]
    Serialization { provider: String, message: String },

    #[error("Failed to parse {provider} response: {message}")]
    ResponseParsing { provider: String, message: String },

    /// Non-2xx response from the upstream API
    #[error("API error for {provider} (status {status}): {message}")]
    ApiError {
        provider: String,
        status: u16,
        /// Provider-supplied error code, when the body carried one
        code: Option<String>,
        message: String,
        retry_after: Option<u64>,
    },

    #[error("Operation cancelled for {provider}: {reason}")]
    Cancelled { provider: String, reason: String },

    #[error("{provider} error: {message}")]
    Other { provider: String, message: String },
}

impl ProviderError {
    /// Create authentication error
    pub fn authentication(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Authentication {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create rate limit error
    pub fn rate_limit(provider: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            provider: provider.into(),
            message: match retry_after {
                Some(seconds) => format!("Rate limit exceeded. Retry after {} seconds", seconds),
                None => "Rate limit exceeded".to_string(),
            },
            retry_after,
        }
    }

    /// Create model not found error
    pub fn model_not_found(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self::ModelNotFound {
            provider: provider.into(),
            model: model.into(),
        }
    }

    /// Create invalid request error
    pub fn invalid_request(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create network error
    pub fn network(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create timeout error
    pub fn timeout(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Timeout {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create provider unavailable error
    pub fn provider_unavailable(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create not configured error
    pub fn not_configured(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotConfigured {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create unknown provider error
    pub fn unknown_provider(provider: impl Into<String>) -> Self {
        Self::UnknownProvider {
            provider: provider.into(),
        }
    }

    /// Create missing implementation error
    pub fn provider_class_not_found(provider_type: impl Into<String>) -> Self {
        Self::ProviderClassNotFound {
            provider_type: provider_type.into(),
        }
    }

    /// Create not supported error
    pub fn not_supported(provider: impl Into<String>, feature: impl Into<String>) -> Self {
        Self::NotSupported {
            provider: provider.into(),
            feature: feature.into(),
        }
    }

    /// Create configuration error
    pub fn configuration(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create serialization error
    pub fn serialization(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create response parsing error
    pub fn response_parsing(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ResponseParsing {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create API error with status code
    pub fn api_error(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            provider: provider.into(),
            status,
            code: None,
            message: message.into(),
            retry_after: None,
        }
    }

    /// Create cancellation error
    pub fn cancelled(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Cancelled {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Create other/generic error
    pub fn other(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Other {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Build a structured status failure from a non-2xx response body.
    ///
    /// Understands `{"error": {"code" | "type", "message"}}`, `{"error": "..."}`
    /// and `{"message": "..."}` bodies. Anything else yields `"status N"`.
    pub fn from_status(
        provider: impl Into<String>,
        status: u16,
        body: &str,
        retry_after: Option<u64>,
    ) -> Self {
        let provider = provider.into();
        let (code, message) = parse_error_body(body);
        let message = message.unwrap_or_else(|| format!("status {}", status));

        if status == 429 {
            return Self::RateLimit {
                provider,
                message,
                retry_after,
            };
        }

        Self::ApiError {
            provider,
            status,
            code,
            message,
            retry_after,
        }
    }

    /// Get the provider name that caused this error
    pub fn provider(&self) -> &str {
        match self {
            Self::Authentication { provider, .. }
            | Self::RateLimit { provider, .. }
            | Self::ModelNotFound { provider, .. }
            | Self::InvalidRequest { provider, .. }
            | Self::Network { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::ProviderUnavailable { provider, .. }
            | Self::NotConfigured { provider, .. }
            | Self::UnknownProvider { provider }
            | Self::NotSupported { provider, .. }
            | Self::Configuration { provider, .. }
            | Self::Serialization { provider, .. }
            | Self::ResponseParsing { provider, .. }
            | Self::ApiError { provider, .. }
            | Self::Cancelled { provider, .. }
            | Self::Other { provider, .. } => provider,
            Self::ProviderClassNotFound { provider_type } => provider_type,
        }
    }

    /// Stable category code used by retry and fallback classification
    pub fn code(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "authentication_error",
            Self::RateLimit { .. } => "rate_limit",
            Self::ModelNotFound { .. } => "invalid_model",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::Network { .. } => "connection_failed",
            Self::Timeout { .. } => "timeout",
            Self::ProviderUnavailable { .. } => "transient",
            Self::NotConfigured { .. } => "provider_not_configured",
            Self::UnknownProvider { .. } => "invalid_provider",
            Self::ProviderClassNotFound { .. } => "provider_class_not_found",
            Self::NotSupported { .. } => "not_supported",
            Self::Configuration { .. } => "configuration_error",
            Self::Serialization { .. } => "serialization_error",
            Self::ResponseParsing { .. } => "response_parsing_error",
            Self::ApiError { .. } => "api_error",
            Self::Cancelled { .. } => "cancelled",
            Self::Other { .. } => "unknown_error",
        }
    }

    /// Provider-supplied error code, falling back to the category code
    pub fn upstream_code(&self) -> &str {
        match self {
            Self::ApiError {
                code: Some(code), ..
            } => code,
            _ => self.code(),
        }
    }

    /// HTTP status carried by a structured failure
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimit { .. } => Some(429),
            Self::ApiError { status, .. } => Some(*status),
            Self::Authentication { .. } => Some(401),
            Self::InvalidRequest { .. } => Some(400),
            _ => None,
        }
    }

    /// Seconds requested by an upstream `Retry-After` header
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after, .. } | Self::ApiError { retry_after, .. } => {
                *retry_after
            }
            _ => None,
        }
    }

    /// Misconfiguration that no amount of retrying can fix
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ModelNotFound { .. }
                | Self::NotConfigured { .. }
                | Self::UnknownProvider { .. }
                | Self::ProviderClassNotFound { .. }
                | Self::Configuration { .. }
        )
    }

    /// Human readable message without the provider prefix
    pub fn message(&self) -> String {
        match self {
            Self::Authentication { message, .. }
            | Self::RateLimit { message, .. }
            | Self::InvalidRequest { message, .. }
            | Self::Network { message, .. }
            | Self::Timeout { message, .. }
            | Self::ProviderUnavailable { message, .. }
            | Self::NotConfigured { message, .. }
            | Self::Configuration { message, .. }
            | Self::Serialization { message, .. }
            | Self::ResponseParsing { message, .. }
            | Self::ApiError { message, .. }
            | Self::Other { message, .. } => message.clone(),
            Self::Cancelled { reason, .. } => reason.clone(),
            Self::ModelNotFound { model, .. } => format!("model '{}' not available", model),
            Self::UnknownProvider { provider } => format!("unknown provider '{}'", provider),
            Self::ProviderClassNotFound { provider_type } => {
                format!("no implementation for provider type '{}'", provider_type)
            }
            Self::NotSupported { feature, .. } => format!("'{}' not supported", feature),
        }
    }

    /// Attach the provider name to an error produced by a generic conversion
    pub fn with_provider(mut self, name: &str) -> Self {
        match &mut self {
            Self::Authentication { provider, .. }
            | Self::RateLimit { provider, .. }
            | Self::ModelNotFound { provider, .. }
            | Self::InvalidRequest { provider, .. }
            | Self::Network { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::ProviderUnavailable { provider, .. }
            | Self::NotConfigured { provider, .. }
            | Self::UnknownProvider { provider }
            | Self::NotSupported { provider, .. }
            | Self::Configuration { provider, .. }
            | Self::Serialization { provider, .. }
            | Self::ResponseParsing { provider, .. }
            | Self::ApiError { provider, .. }
            | Self::Cancelled { provider, .. }
            | Self::Other { provider, .. } => *provider = name.to_string(),
            Self::ProviderClassNotFound { .. } => {}
        }
        self
    }
}

fn parse_error_body(body: &str) -> (Option<String>, Option<String>) {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return (None, None);
    };

    match json.get("error") {
        Some(Value::Object(error)) => {
            let code = error
                .get("code")
                .or_else(|| error.get("type"))
                .and_then(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                });
            let message = error
                .get("message")
                .and_then(|v| v.as_str())
                .map(str::to_string);
            (code, message)
        }
        Some(Value::String(message)) => (None, Some(message.clone())),
        _ => (
            None,
            json.get("message")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        ),
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        let provider = "unknown";

        if err.is_timeout() {
            Self::timeout(provider, err.to_string())
        } else if err.is_connect() || err.is_request() {
            Self::network(provider, err.to_string())
        } else if err.is_decode() {
            Self::response_parsing(provider, err.to_string())
        } else {
            Self::other(provider, err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization("unknown", err.to_string())
    }
}
