//! Retry loop

use super::policy::RetryPolicy;
use crate::config::RetryConfig;
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::RequestContext;
use crate::utils::error::{OrchestratorError, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// What one executor run did, successful or not
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetryReport {
    /// Attempts started, including the first
    pub attempts: u32,
    /// Every delay slept, in order
    pub delays: Vec<Duration>,
}

impl RetryReport {
    /// Retries beyond the first attempt
    pub fn retries(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }
}

/// Runs an attempt function under a retry policy
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(RetryPolicy::from(config))
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `operation` under the executor's policy
    pub async fn execute<T, F, Fut>(
        &self,
        label: &str,
        ctx: &RequestContext,
        operation: F,
    ) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = std::result::Result<T, ProviderError>>,
    {
        self.execute_with_report(label, ctx, None, operation).await.0
    }

    /// Run `operation(attempt)` until it succeeds, fails terminally or the
    /// retries run out.
    ///
    /// `policy` overrides the executor's policy for this call. `label` names
    /// the provider in logs and in `RetriesExhausted`.
    pub async fn execute_with_report<T, F, Fut>(
        &self,
        label: &str,
        ctx: &RequestContext,
        policy: Option<&RetryPolicy>,
        mut operation: F,
    ) -> (Result<T>, RetryReport)
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = std::result::Result<T, ProviderError>>,
    {
        let policy = policy.unwrap_or(&self.policy);
        let mut report = RetryReport::default();
        let mut attempt: u32 = 0;
        let mut last_error: Option<ProviderError> = None;

        loop {
            if let Err(e) = ctx.check() {
                return (Err(e.with_last_error(last_error)), report);
            }

            report.attempts += 1;
            let error = match ctx.guard(operation(attempt)).await {
                Ok(Ok(value)) => {
                    if attempt > 0 {
                        debug!(provider = label, attempt, "Retry succeeded");
                    }
                    return (Ok(value), report);
                }
                Ok(Err(error)) => error,
                Err(interrupted) => return (Err(interrupted.with_last_error(last_error)), report),
            };

            if !policy.should_retry(&error) {
                debug!(
                    provider = label,
                    attempt,
                    code = error.code(),
                    "Non-retryable failure"
                );
                return (Err(error.into()), report);
            }

            if attempt >= policy.max_retries {
                warn!(
                    provider = label,
                    attempts = report.attempts,
                    error = %error,
                    "Retries exhausted"
                );
                return (
                    Err(OrchestratorError::RetriesExhausted {
                        provider: label.to_string(),
                        attempts: report.attempts,
                        last_error: error,
                    }),
                    report,
                );
            }

            let delay = policy.delay_for(&error, attempt);
            info!(
                provider = label,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Retrying after failure"
            );
            report.delays.push(delay);

            if let Err(interrupted) = ctx.guard(tokio::time::sleep(delay)).await {
                return (Err(interrupted.with_last_error(Some(error))), report);
            }
            last_error = Some(error);
            attempt += 1;
        }
    }
}
