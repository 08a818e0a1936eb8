//! Failure classification

use super::policy::RetryPolicy;
use crate::core::providers::unified_provider::ProviderError;
use std::time::Duration;

/// Message fragments that mark a hard error as transient
pub const TRANSIENT_PHRASES: &[&str] = &[
    "timeout",
    "connection",
    "network",
    "temporarily",
    "unavailable",
    "server error",
];

impl RetryPolicy {
    /// 429 always, then the configured set, then any 5xx
    pub fn is_retryable_status(&self, status: u16) -> bool {
        status == 429
            || self.retryable_status_codes.contains(&status)
            || (500..=599).contains(&status)
    }

    /// Classify a failure that carries no status code
    pub fn is_retryable_error(&self, error: &ProviderError) -> bool {
        if error.is_configuration() || matches!(error, ProviderError::Cancelled { .. }) {
            return false;
        }

        if self.retryable_errors.iter().any(|code| code == error.code()) {
            return true;
        }

        let message = error.message().to_lowercase();
        TRANSIENT_PHRASES
            .iter()
            .any(|phrase| message.contains(phrase))
    }

    /// Structured failures go through status classification, the rest
    /// through error classification
    pub fn should_retry(&self, error: &ProviderError) -> bool {
        match error.status() {
            Some(status) => self.is_retryable_status(status),
            None => self.is_retryable_error(error),
        }
    }

    /// Wait before retrying after `error` on attempt `attempt`
    pub fn delay_for(&self, error: &ProviderError, attempt: u32) -> Duration {
        match (error.status(), error.retry_after()) {
            (Some(429), Some(seconds)) => self.retry_after_delay(seconds),
            _ => self.backoff_delay(attempt),
        }
    }
}
