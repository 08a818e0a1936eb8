//! Common test utilities for llm-orchestrator
//!
//! All fixtures build real objects; HTTP is served by wiremock rather than
//! mocked at the trait level.

pub mod fixtures;

pub use fixtures::{chat_body, embedding_body, http_settings, scripted_registry};

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err and return the error
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
