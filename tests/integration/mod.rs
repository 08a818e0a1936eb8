//! Integration tests for llm-orchestrator
//!
//! These tests drive several components together against wiremock servers and
//! scripted providers.

pub mod config_tests;
pub mod embedding_tests;
pub mod fallback_tests;
pub mod openai_compatible_tests;
