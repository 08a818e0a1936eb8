//! Embedding types

use serde::{Deserialize, Serialize};

/// Embedding vector
pub type Embedding = Vec<f32>;

/// Embedding input type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    /// Single text
    Text(String),
    /// Text list
    Array(Vec<String>),
}

impl EmbeddingInput {
    /// Convert to text vector
    pub fn into_vec(self) -> Vec<String> {
        match self {
            EmbeddingInput::Text(text) => vec![text],
            EmbeddingInput::Array(texts) => texts,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            EmbeddingInput::Text(_) => 1,
            EmbeddingInput::Array(texts) => texts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for EmbeddingInput {
    fn from(text: &str) -> Self {
        EmbeddingInput::Text(text.to_string())
    }
}

impl From<String> for EmbeddingInput {
    fn from(text: String) -> Self {
        EmbeddingInput::Text(text)
    }
}

impl From<Vec<String>> for EmbeddingInput {
    fn from(texts: Vec<String>) -> Self {
        EmbeddingInput::Array(texts)
    }
}

/// What a provider hands back from an embedding call
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingOutput {
    /// Bare vector, as some APIs answer single-text requests
    Single(Embedding),
    /// One vector per input text
    Batch(Vec<Embedding>),
}

impl EmbeddingOutput {
    /// Normalize to one vector per input
    pub fn into_vectors(self) -> Vec<Embedding> {
        match self {
            EmbeddingOutput::Single(vector) => vec![vector],
            EmbeddingOutput::Batch(vectors) => vectors,
        }
    }
}
