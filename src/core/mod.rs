//! Core orchestration
//!
//! Provider abstraction, retry, routing, fallback and embeddings.

pub mod embedding;
pub mod fallback;
pub mod providers;
pub mod retry;
pub mod router;
pub mod traits;
pub mod types;
