//! OpenAI-compatible provider
//!
//! Works against any API exposing `/chat/completions`, `/embeddings` and
//! `/models` in the OpenAI wire format (OpenAI itself, Groq, DeepSeek,
//! Together, local inference servers, ...).

mod provider;
mod wire;

pub use provider::{DEFAULT_BASE_URL, OpenAICompatibleProvider, parse_retry_after};
