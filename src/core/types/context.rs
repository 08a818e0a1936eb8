//! Request context types

use crate::utils::error::{OrchestratorError, Result};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Request-scoped context carried through routing, retries and fallback
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request ID
    pub request_id: String,
    /// Start time
    pub start_time: Instant,
    /// Hard deadline for the whole logical request
    pub deadline: Option<Instant>,
    /// Cancelled by the caller when it stops waiting
    pub cancellation: CancellationToken,
    /// Extra metadata
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            start_time: Instant::now(),
            deadline: None,
            cancellation: CancellationToken::new(),
            metadata: HashMap::new(),
        }
    }
}

impl RequestContext {
    /// Create new request context
    pub fn new() -> Self {
        Self::default()
    }

    /// Deadline relative to now
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Time left before the deadline
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Fails fast when the request is already cancelled or past its deadline
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(OrchestratorError::cancelled("request cancelled"));
        }
        if self.is_expired() {
            return Err(OrchestratorError::cancelled("request deadline exceeded"));
        }
        Ok(())
    }

    /// Drive `fut` until it completes, the token fires or the deadline passes
    pub async fn guard<F: Future>(&self, fut: F) -> Result<F::Output> {
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => {
                Err(OrchestratorError::cancelled("request cancelled"))
            }
            _ = deadline => Err(OrchestratorError::cancelled("request deadline exceeded")),
            output = fut => Ok(output),
        }
    }
}
