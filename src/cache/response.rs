//! In-memory response cache.
//!
//! [`ResponseCache`] memoizes answers keyed on a [`Fingerprint`] of
//! (question, mode, statistics). Entries are bounded by count with LRU
//! eviction and expire after a TTL, since statistics may be reloaded with
//! new data under the same session.
//!
//! Both LLM and fallback answers are cached: during a short outage an
//! identical question is answered from the cache instead of hitting the
//! failing service again.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use moka::policy::EvictionPolicy;

use super::{CacheBackend, Fingerprint};
use crate::error::CacheError;
use crate::telemetry;
use crate::types::AiResponse;

/// Configuration for the response cache.
///
/// ```rust
/// # use lst_advisor::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(1_000)
///     .ttl(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 256.
    pub max_entries: u64,
    /// Time-to-live for cached entries. Default: 30 minutes.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 256,
            ttl: Duration::from_secs(30 * 60),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Moka-backed LRU + TTL cache of answers.
///
/// Safe to share between tasks; moka serializes its eviction bookkeeping
/// internally, and lookups never block on a network call.
pub struct ResponseCache {
    cache: Cache<Fingerprint, AiResponse>,
}

impl ResponseCache {
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self { cache }
    }

    /// Look up a cached answer. Emits hit/miss metrics.
    pub async fn get(&self, key: &Fingerprint) -> Option<AiResponse> {
        match self.cache.get(key).await {
            Some(response) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                Some(response)
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Insert (or overwrite) an answer.
    pub async fn insert(&self, key: Fingerprint, value: AiResponse) {
        self.cache.insert(key, value).await;
    }

    /// Approximate number of live entries.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Apply pending evictions and expirations now.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }

    /// Evict all entries.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

#[async_trait]
impl CacheBackend for ResponseCache {
    async fn get(&self, key: &Fingerprint) -> Result<Option<AiResponse>, CacheError> {
        Ok(ResponseCache::get(self, key).await)
    }

    async fn insert(&self, key: Fingerprint, value: AiResponse) -> Result<(), CacheError> {
        ResponseCache::insert(self, key, value).await;
        Ok(())
    }
}
