//! Chain-level failure classification

use crate::utils::error::OrchestratorError;

/// Configuration codes that stop the chain immediately
pub const TERMINAL_CODES: &[&str] = &[
    "provider_not_configured",
    "invalid_model",
    "invalid_provider",
    "provider_class_not_found",
];

/// Whether the next route could plausibly succeed after `error`
///
/// Configuration errors and cancellation stop the chain. Otherwise an embedded
/// status decides: 429 and 5xx advance, other 4xx stop. Anything else advances.
pub fn is_chain_retryable(error: &OrchestratorError) -> bool {
    if error.is_cancelled() || error.is_configuration() {
        return false;
    }

    if TERMINAL_CODES.contains(&error.code()) {
        return false;
    }

    if matches!(
        error,
        OrchestratorError::Validation(_)
            | OrchestratorError::EmbeddingUnsupported { .. }
            | OrchestratorError::DimensionMismatch { .. }
    ) {
        return false;
    }

    match error.status() {
        Some(429) => true,
        Some(status) if (500..=599).contains(&status) => true,
        Some(status) if (400..=499).contains(&status) => false,
        _ => true,
    }
}
