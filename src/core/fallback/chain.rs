//! Fallback chain state and attempt telemetry

use crate::core::router::Route;
use crate::utils::error::OrchestratorError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Telemetry for one route execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub provider: String,
    pub model: String,
    pub success: bool,
    /// Wall time of the route including retries and backoff
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Retries the executor spent on this route
    pub retry_attempts: u32,
    pub finished_at: DateTime<Utc>,
}

impl AttemptRecord {
    pub fn succeeded(
        provider: impl Into<String>,
        model: impl Into<String>,
        latency_ms: u64,
        retry_attempts: u32,
    ) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            success: true,
            latency_ms,
            error: None,
            error_code: None,
            retry_attempts,
            finished_at: Utc::now(),
        }
    }

    pub fn failed(
        provider: impl Into<String>,
        model: impl Into<String>,
        latency_ms: u64,
        error: &OrchestratorError,
        retry_attempts: u32,
    ) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            success: false,
            latency_ms,
            error: Some(error.to_string()),
            error_code: Some(error.code().to_string()),
            retry_attempts,
            finished_at: Utc::now(),
        }
    }
}

/// Aggregate failure of a whole chain
#[derive(Debug)]
pub struct ChainFailure {
    /// Every route attempted, in order
    pub attempts: Vec<AttemptRecord>,
    pub last_error: Box<OrchestratorError>,
}

impl ChainFailure {
    pub fn new(attempts: Vec<AttemptRecord>, last_error: OrchestratorError) -> Self {
        Self {
            attempts,
            last_error: Box::new(last_error),
        }
    }
}

impl fmt::Display for ChainFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} route(s) attempted", self.attempts.len())?;
        if !self.attempts.is_empty() {
            let tried: Vec<String> = self
                .attempts
                .iter()
                .map(|a| {
                    format!(
                        "{}/{} ({})",
                        a.provider,
                        a.model,
                        a.error_code.as_deref().unwrap_or("ok")
                    )
                })
                .collect();
            write!(f, " [{}]", tried.join(", "))?;
        }
        write!(f, "; last error: {}", self.last_error)
    }
}

/// Chain state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    /// Route `i` is next to run
    Attempting(usize),
    /// Route `i` succeeded
    Success(usize),
    /// Route failed retryably; route `i` is next
    Advance(usize),
    /// Route `i` failed terminally
    Aborted(usize),
    /// Every route failed retryably
    Exhausted,
}

impl ChainState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ChainState::Success(_) | ChainState::Aborted(_) | ChainState::Exhausted
        )
    }
}

/// Ordered routes for one logical request plus what happened to each
#[derive(Debug)]
pub struct FallbackChain {
    routes: Vec<Route>,
    attempts: Vec<AttemptRecord>,
    state: ChainState,
}

impl FallbackChain {
    pub fn new(routes: Vec<Route>) -> Self {
        let state = if routes.is_empty() {
            ChainState::Exhausted
        } else {
            ChainState::Attempting(0)
        };
        Self {
            routes,
            attempts: Vec::new(),
            state,
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn state(&self) -> ChainState {
        self.state
    }

    pub fn attempts(&self) -> &[AttemptRecord] {
        &self.attempts
    }

    /// Route waiting to run, if any
    pub fn current(&self) -> Option<&Route> {
        match self.state {
            ChainState::Attempting(index) => self.routes.get(index),
            _ => None,
        }
    }

    pub fn record_success(&mut self, record: AttemptRecord) -> ChainState {
        if let ChainState::Attempting(index) = self.state {
            self.attempts.push(record);
            self.state = ChainState::Success(index);
        }
        self.state
    }

    /// Record a failed route; `retryable` decides between advancing and aborting
    pub fn record_failure(&mut self, record: AttemptRecord, retryable: bool) -> ChainState {
        if let ChainState::Attempting(index) = self.state {
            self.attempts.push(record);
            self.state = if !retryable {
                ChainState::Aborted(index)
            } else if index + 1 < self.routes.len() {
                ChainState::Advance(index + 1)
            } else {
                ChainState::Exhausted
            };
        }
        self.state
    }

    /// Move from `Advance(i)` to `Attempting(i)`
    pub fn advance(&mut self) -> ChainState {
        if let ChainState::Advance(next) = self.state {
            self.state = ChainState::Attempting(next);
        }
        self.state
    }

    pub fn into_failure(self, last_error: OrchestratorError) -> ChainFailure {
        ChainFailure::new(self.attempts, last_error)
    }
}
