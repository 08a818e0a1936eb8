//! Retry executor
//!
//! Runs a single provider call under a [`RetryPolicy`]: bounded attempts,
//! exponential backoff with jitter, status and error classification, and
//! `Retry-After` honoring. Every wait is a `tokio` timer suspension guarded by
//! the request's cancellation token and deadline.

mod classify;
mod executor;
mod policy;
#[cfg(test)]
mod tests;

pub use classify::TRANSIENT_PHRASES;
pub use executor::{RetryExecutor, RetryReport};
pub use policy::RetryPolicy;
