//! Error handling for the orchestration layer
//!
//! `ProviderError` is what a single backend call fails with; `OrchestratorError`
//! is what callers of the retry executor, fallback orchestrator and embedding
//! service see.

#![allow(missing_docs)]

mod conversions;
mod helpers;
mod types;

pub use types::{OrchestratorError, Result};
