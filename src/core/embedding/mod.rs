//! Embedding service
//!
//! - `service` - provider/model resolution, generation, batching, caching
//! - `cache` - bounded TTL cache keyed by (text, provider, model)
//! - `similarity` - cosine similarity and nearest-candidate ranking
//! - `validation` - text and batch checks

pub mod cache;
pub mod service;
pub mod similarity;
pub mod validation;


pub use cache::{CacheEntry, CacheStats, EmbeddingCache};
pub use service::{EmbeddingOptions, EmbeddingService};
pub use similarity::{DEFAULT_TOP_K, SimilarityMatch, cosine_similarity, find_most_similar};
pub use validation::{validate_batch_size, validate_texts};
