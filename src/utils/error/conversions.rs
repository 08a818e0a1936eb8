//! Type conversions for OrchestratorError

use super::types::OrchestratorError;
use crate::core::providers::unified_provider::ProviderError;

impl From<ProviderError> for OrchestratorError {
    fn from(err: ProviderError) -> Self {
        if err.is_configuration() {
            return OrchestratorError::Configuration {
                code: err.code().to_string(),
                message: err.to_string(),
            };
        }

        match err {
            ProviderError::Network { provider, message }
            | ProviderError::Timeout { provider, message }
            | ProviderError::ProviderUnavailable { provider, message } => {
                OrchestratorError::TransientNetwork { provider, message }
            }
            ProviderError::RateLimit {
                provider,
                message,
                retry_after,
            } => OrchestratorError::RateLimited {
                provider,
                message,
                retry_after,
            },
            ProviderError::ApiError {
                provider,
                status,
                code,
                message,
                retry_after,
            } => match status {
                429 => OrchestratorError::RateLimited {
                    provider,
                    message,
                    retry_after,
                },
                500..=599 => OrchestratorError::UpstreamServerError {
                    provider,
                    status,
                    message,
                },
                _ => OrchestratorError::UpstreamClientError {
                    provider,
                    status,
                    code: code.unwrap_or_else(|| "api_error".to_string()),
                    message,
                },
            },
            ProviderError::Authentication { provider, message } => {
                OrchestratorError::UpstreamClientError {
                    provider,
                    status: 401,
                    code: "authentication_error".to_string(),
                    message,
                }
            }
            ProviderError::InvalidRequest { provider, message } => {
                OrchestratorError::UpstreamClientError {
                    provider,
                    status: 400,
                    code: "invalid_request".to_string(),
                    message,
                }
            }
            ProviderError::NotSupported { provider, feature } if feature == "embeddings" => {
                OrchestratorError::EmbeddingUnsupported { provider }
            }
            ProviderError::NotSupported { provider, feature } => OrchestratorError::Configuration {
                code: "not_supported".to_string(),
                message: format!("Feature '{}' not supported by {}", feature, provider),
            },
            ProviderError::Serialization { provider, message }
            | ProviderError::ResponseParsing { provider, message } => {
                OrchestratorError::UpstreamResponse { provider, message }
            }
            ProviderError::Cancelled { provider, reason } => {
                OrchestratorError::cancelled(format!("{}: {}", provider, reason))
            }
            other => OrchestratorError::Provider(other),
        }
    }
}
