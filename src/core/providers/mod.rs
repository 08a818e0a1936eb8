//! Provider implementations and registry
//!
//! The orchestration core only depends on the `LLMProvider` trait and the
//! registry; the concrete providers here are leaves.

pub mod openai_compatible;
pub mod provider_registry;
pub mod scripted;
pub mod unified_provider;

pub use openai_compatible::OpenAICompatibleProvider;
pub use provider_registry::{ProviderFactories, ProviderFactory, ProviderRegistry};
pub use scripted::{ScriptedProvider, synthetic_embedding};
pub use unified_provider::ProviderError;
