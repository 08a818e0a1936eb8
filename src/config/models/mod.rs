//! Configuration data models

#![allow(missing_docs)]

pub mod embedding;
pub mod fallback;
pub mod logging;
pub mod provider;
pub mod retry;
pub mod routing;

// Re-export all configuration types
pub use embedding::*;
pub use fallback::*;
pub use logging::*;
pub use provider::*;
pub use retry::*;
pub use routing::*;

/// Default provider request timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

/// Default maximum retry attempts
pub fn default_max_retries() -> u32 {
    3
}

pub fn default_initial_delay_ms() -> u64 {
    1000
}

pub fn default_max_delay_ms() -> u64 {
    60_000
}

pub fn default_exponential_base() -> f64 {
    2.0
}

/// Fraction of the computed delay added as random jitter
pub fn default_jitter_max() -> f64 {
    0.1
}

pub fn default_retryable_status_codes() -> Vec<u16> {
    vec![408, 429, 500, 502, 503, 504]
}

pub fn default_retryable_errors() -> Vec<String> {
    vec![
        "timeout".to_string(),
        "connection_failed".to_string(),
        "transient".to_string(),
    ]
}

pub fn default_simple_threshold() -> usize {
    50
}

pub fn default_medium_threshold() -> usize {
    200
}

/// 24 hours
pub fn default_embedding_cache_ttl() -> u64 {
    86_400
}

pub fn default_embedding_cache_max_entries() -> usize {
    10_000
}

pub fn default_embedding_batch_size() -> usize {
    100
}

pub fn default_embedding_batch_delay_ms() -> u64 {
    100
}

/// Characters
pub fn default_max_text_length() -> usize {
    8000
}

pub fn default_provider_type() -> String {
    "openai_compatible".to_string()
}

pub fn default_true() -> bool {
    true
}
