//! Fallback orchestration
//!
//! A logical completion runs over an ordered chain of routes. Each route runs
//! under the retry executor; a retryable failure advances to the next route,
//! a terminal one aborts the chain.

pub mod chain;
pub mod execution;
pub mod orchestrator;
pub mod preferences;


pub use chain::{AttemptRecord, ChainFailure, ChainState, FallbackChain};
pub use execution::{TERMINAL_CODES, is_chain_retryable};
pub use orchestrator::{CompletionArgs, FallbackOrchestrator, FallbackResponse};
pub use preferences::ModelPreferences;
