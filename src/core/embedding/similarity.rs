//! Vector similarity

use crate::core::types::Embedding;
use crate::utils::error::{OrchestratorError, Result};
use serde::{Deserialize, Serialize};

/// Default number of matches returned by [`find_most_similar`]
pub const DEFAULT_TOP_K: usize = 10;

/// Candidate index and its similarity to the query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatch {
    pub index: usize,
    pub similarity: f32,
}

/// Cosine similarity of two equal-length vectors
///
/// Returns 0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(OrchestratorError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    Ok(similarity.clamp(-1.0, 1.0) as f32)
}

/// Top `top_k` candidates by similarity to `query`, most similar first
///
/// Candidates whose dimension differs from the query are skipped.
pub fn find_most_similar(query: &[f32], candidates: &[Embedding], top_k: usize) -> Vec<SimilarityMatch> {
    let mut matches: Vec<SimilarityMatch> = candidates
        .iter()
        .enumerate()
        .filter_map(|(index, candidate)| {
            cosine_similarity(query, candidate)
                .ok()
                .map(|similarity| SimilarityMatch { index, similarity })
        })
        .collect();

    matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    matches.truncate(top_k);
    matches
}
