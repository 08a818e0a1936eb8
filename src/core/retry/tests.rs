//! Retry executor tests

use super::*;
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::RequestContext;
use crate::utils::error::OrchestratorError;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

fn policy() -> RetryPolicy {
    RetryPolicy::default()
        .with_max_retries(3)
        .with_initial_delay(Duration::from_secs(1))
        .with_max_delay(Duration::from_secs(60))
        .with_exponential_base(2.0)
        .without_jitter()
}

fn secs(delays: &[Duration]) -> Vec<u64> {
    delays.iter().map(|d| d.as_secs()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_then_success() {
    let executor = RetryExecutor::new(policy());
    let ctx = RequestContext::new();
    let calls = Arc::new(AtomicU32::new(0));
    let started = Instant::now();

    let (result, report) = executor
        .execute_with_report("openai", &ctx, None, |attempt| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                if attempt < 3 {
                    Err(ProviderError::timeout("openai", "read timed out"))
                } else {
                    Ok("done")
                }
            }
        })
        .await;

    assert_eq!(result.unwrap(), "done");
    assert_eq!(report.attempts, 4);
    assert_eq!(secs(&report.delays), vec![1, 2, 4]);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(started.elapsed(), Duration::from_secs(7));
}

#[tokio::test(start_paused = true)]
async fn test_retry_after_overrides_backoff() {
    let executor = RetryExecutor::new(policy());
    let ctx = RequestContext::new();

    let (result, report) = executor
        .execute_with_report("anthropic", &ctx, None, |attempt| async move {
            if attempt == 0 {
                Err(ProviderError::from_status("anthropic", 429, "{}", Some(5)))
            } else {
                Ok(attempt)
            }
        })
        .await;

    assert_eq!(result.unwrap(), 1);
    assert_eq!(report.delays, vec![Duration::from_secs(5)]);
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_preserves_last_error() {
    let executor = RetryExecutor::new(policy().with_max_retries(2));
    let ctx = RequestContext::new();

    let (result, report) = executor
        .execute_with_report::<(), _, _>("openai", &ctx, None, |attempt| async move {
            Err(ProviderError::api_error(
                "openai",
                503,
                format!("overloaded #{}", attempt),
            ))
        })
        .await;

    assert_eq!(report.attempts, 3);
    match result.unwrap_err() {
        OrchestratorError::RetriesExhausted {
            provider,
            attempts,
            last_error,
        } => {
            assert_eq!(provider, "openai");
            assert_eq!(attempts, 3);
            assert_eq!(last_error.message(), "overloaded #2");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_client_error_not_retried() {
    let executor = RetryExecutor::new(policy());
    let ctx = RequestContext::new();
    let calls = Arc::new(AtomicU32::new(0));

    let body = r#"{"error": {"code": "invalid_api_key", "message": "bad key"}}"#;
    let result: crate::utils::error::Result<()> = executor
        .execute("openai", &ctx, |_| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ProviderError::from_status("openai", 401, body, None))
            }
        })
        .await;

    let err = result.unwrap_err();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.code(), "invalid_api_key");
}

#[tokio::test(start_paused = true)]
async fn test_configuration_error_not_retried() {
    let executor = RetryExecutor::new(policy());
    let ctx = RequestContext::new();

    let (result, report) = executor
        .execute_with_report::<(), _, _>("openai", &ctx, None, |_| async {
            Err(ProviderError::model_not_found("openai", "gpt-5-timeout"))
        })
        .await;

    assert_eq!(report.attempts, 1);
    assert!(report.delays.is_empty());
    assert!(result.unwrap_err().is_configuration());
}

#[tokio::test(start_paused = true)]
async fn test_unclassified_hard_error_terminal() {
    let executor = RetryExecutor::new(policy());
    let ctx = RequestContext::new();

    let (result, report) = executor
        .execute_with_report::<(), _, _>("openai", &ctx, None, |_| async {
            Err(ProviderError::other("openai", "unexpected tool call format"))
        })
        .await;

    assert_eq!(report.attempts, 1);
    assert!(matches!(result, Err(OrchestratorError::Provider(_))));
}

#[tokio::test(start_paused = true)]
async fn test_zero_retries_single_attempt() {
    let executor = RetryExecutor::new(policy().with_max_retries(0));
    let ctx = RequestContext::new();

    let (result, report) = executor
        .execute_with_report::<(), _, _>("openai", &ctx, None, |_| async {
            Err(ProviderError::network("openai", "connection refused"))
        })
        .await;

    assert_eq!(report.attempts, 1);
    assert!(matches!(
        result,
        Err(OrchestratorError::RetriesExhausted { attempts: 1, .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_per_call_policy_override() {
    let executor = RetryExecutor::new(policy());
    let ctx = RequestContext::new();
    let override_policy = policy()
        .with_max_retries(1)
        .with_initial_delay(Duration::from_millis(10));

    let (_, report) = executor
        .execute_with_report::<(), _, _>("openai", &ctx, Some(&override_policy), |_| async {
            Err(ProviderError::timeout("openai", "slow"))
        })
        .await;

    assert_eq!(report.attempts, 2);
    assert_eq!(report.delays, vec![Duration::from_millis(10)]);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_interrupts_backoff() {
    let executor = RetryExecutor::new(policy().with_max_retries(5));
    let ctx = RequestContext::new().with_timeout(Duration::from_millis(2500));
    let started = Instant::now();

    let (result, report) = executor
        .execute_with_report::<(), _, _>("openai", &ctx, None, |_| async {
            Err(ProviderError::api_error("openai", 503, "upstream overloaded"))
        })
        .await;

    let err = result.unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().contains("upstream overloaded"));
    assert!(matches!(
        err,
        OrchestratorError::Cancelled {
            last_error: Some(ProviderError::ApiError { status: 503, .. }),
            ..
        }
    ));
    assert_eq!(report.attempts, 2);
    assert_eq!(started.elapsed(), Duration::from_millis(2500));
}

#[tokio::test(start_paused = true)]
async fn test_deadline_during_retry_keeps_previous_error() {
    let executor = RetryExecutor::new(policy().with_max_retries(3));
    let ctx = RequestContext::new().with_timeout(Duration::from_millis(1500));

    let (result, report) = executor
        .execute_with_report::<(), _, _>("openai", &ctx, None, |attempt| async move {
            if attempt == 0 {
                Err(ProviderError::timeout("openai", "read timed out"))
            } else {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            }
        })
        .await;

    let err = result.unwrap_err();
    assert!(err.is_cancelled());
    assert!(err.to_string().contains("read timed out"));
    assert_eq!(report.attempts, 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_before_first_attempt() {
    let executor = RetryExecutor::new(policy());
    let token = CancellationToken::new();
    token.cancel();
    let ctx = RequestContext::new().with_cancellation(token);

    let (result, report) = executor
        .execute_with_report("openai", &ctx, None, |_| async { Ok::<_, ProviderError>(1) })
        .await;

    assert!(result.unwrap_err().is_cancelled());
    assert_eq!(report.attempts, 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_during_attempt() {
    let executor = RetryExecutor::new(policy());
    let token = CancellationToken::new();
    let ctx = RequestContext::new().with_cancellation(token.clone());

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        token.cancel();
    });

    let (result, report) = executor
        .execute_with_report("openai", &ctx, None, |_| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<_, ProviderError>(())
        })
        .await;

    assert!(result.unwrap_err().is_cancelled());
    assert_eq!(report.attempts, 1);
}
