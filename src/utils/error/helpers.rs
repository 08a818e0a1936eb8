//! Constructors and accessors for `OrchestratorError`

use super::types::OrchestratorError;
use crate::core::fallback::AttemptRecord;
use crate::core::providers::unified_provider::ProviderError;

impl OrchestratorError {
    pub fn configuration<C: Into<String>, S: Into<String>>(code: C, message: S) -> Self {
        Self::Configuration {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn cancelled<S: Into<String>>(reason: S) -> Self {
        Self::Cancelled {
            reason: reason.into(),
            last_error: None,
        }
    }

    /// Attach the failure a retry loop saw before it was interrupted
    pub fn with_last_error(self, error: Option<ProviderError>) -> Self {
        match self {
            Self::Cancelled { reason, last_error } => Self::Cancelled {
                reason,
                last_error: error.or(last_error),
            },
            other => other,
        }
    }

    pub fn upstream_response<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::UpstreamResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn embedding_unsupported<P: Into<String>>(provider: P) -> Self {
        Self::EmbeddingUnsupported {
            provider: provider.into(),
        }
    }

    /// Stable code for logs and attempt records
    pub fn code(&self) -> &str {
        match self {
            Self::TransientNetwork { .. } => "transient_network",
            Self::RateLimited { .. } => "rate_limited",
            Self::UpstreamServerError { .. } => "upstream_server_error",
            Self::UpstreamClientError { code, .. } => code.as_str(),
            Self::Configuration { code, .. } => code.as_str(),
            Self::RetriesExhausted { last_error, .. } => last_error.upstream_code(),
            Self::ChainExhausted(_) => "chain_exhausted",
            Self::ChainAborted(_) => "chain_aborted",
            Self::EmbeddingUnsupported { .. } => "embedding_unsupported",
            Self::DimensionMismatch { .. } => "dimension_mismatch",
            Self::Validation(_) => "validation_error",
            Self::Cancelled { .. } => "cancelled",
            Self::UpstreamResponse { .. } => "upstream_response",
            Self::Provider(err) => err.code(),
            Self::Serialization(_) | Self::Yaml(_) => "serialization_error",
            Self::Io(_) => "io_error",
            Self::HttpClient(_) => "http_client_error",
        }
    }

    /// HTTP status embedded in the failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::UpstreamServerError { status, .. } | Self::UpstreamClientError { status, .. } => {
                Some(*status)
            }
            Self::RetriesExhausted { last_error, .. } => last_error.status(),
            Self::Cancelled {
                last_error: Some(last_error),
                ..
            } => last_error.status(),
            Self::Provider(err) => err.status(),
            Self::HttpClient(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Attempt history of an aggregate chain failure
    pub fn attempts(&self) -> Option<&[AttemptRecord]> {
        match self {
            Self::ChainExhausted(failure) | Self::ChainAborted(failure) => {
                Some(&failure.attempts)
            }
            _ => None,
        }
    }
}
