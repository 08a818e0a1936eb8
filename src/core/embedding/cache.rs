//! Embedding cache
//!
//! Vectors keyed by a SHA-256 of (text, provider, model). Entries expire after
//! a TTL. When full, expired entries go first, then the least recently used
//! tenth.

use crate::config::EmbeddingConfig;
use crate::core::types::Embedding;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Cached vector with access metadata
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub vector: Embedding,
    pub dimension: usize,
    pub created_at: Instant,
    pub expires_at: Instant,
    pub last_accessed: Instant,
}

impl CacheEntry {
    pub fn new(vector: Embedding, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            dimension: vector.len(),
            vector,
            created_at: now,
            expires_at: now + ttl,
            last_accessed: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    fn mark_accessed(&mut self) {
        self.last_accessed = Instant::now();
    }
}

#[derive(Debug, Default)]
struct AtomicCacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

/// Cache statistics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Bounded TTL cache of embedding vectors
#[derive(Debug)]
pub struct EmbeddingCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    max_entries: usize,
    stats: AtomicCacheStats,
}

impl EmbeddingCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries: max_entries.max(1),
            stats: AtomicCacheStats::default(),
        }
    }

    pub fn from_config(config: &EmbeddingConfig) -> Self {
        Self::new(
            Duration::from_secs(config.cache_ttl_secs),
            config.cache_max_entries,
        )
    }

    /// Deterministic key for a (text, provider, model) triple
    pub fn key(text: &str, provider: &str, model: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hasher.update([0u8]);
        hasher.update(provider.as_bytes());
        hasher.update([0u8]);
        hasher.update(model.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Unexpired vector for `key`; expired entries are dropped on read
    pub fn get(&self, key: &str) -> Option<Embedding> {
        let expired = match self.entries.get_mut(key) {
            Some(mut entry) if !entry.is_expired() => {
                entry.mark_accessed();
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.vector.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired
            && self
                .entries
                .remove_if(key, |_, entry| entry.is_expired())
                .is_some()
        {
            debug!(key, "Expired embedding cache entry removed");
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub fn insert(&self, key: String, vector: Embedding) {
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            self.evict();
        }
        self.entries.insert(key, CacheEntry::new(vector, self.ttl));
    }

    /// Purge expired entries, then the least recently used 10% if still full
    pub fn evict(&self) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let mut evicted = before.saturating_sub(self.entries.len());

        if self.entries.len() >= self.max_entries {
            let mut by_access: Vec<(String, Instant)> = self
                .entries
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().last_accessed))
                .collect();
            by_access.sort_by_key(|(_, accessed)| *accessed);

            let count = (self.max_entries / 10).max(1);
            for (key, _) in by_access.into_iter().take(count) {
                if self.entries.remove(&key).is_some() {
                    evicted += 1;
                }
            }
        }

        self.stats
            .evictions
            .fetch_add(evicted as u64, Ordering::Relaxed);
        debug!(evicted, remaining = self.entries.len(), "Embedding cache eviction");
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            evictions: self.stats.evictions.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}
