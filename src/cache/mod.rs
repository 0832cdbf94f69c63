//! Answer caching.
//!
//! - [`Fingerprint`]: stable key over (normalized question, mode,
//!   canonical statistics).
//! - [`CacheBackend`]: the seam the orchestrator talks to. Failures are
//!   reported as [`CacheError`] and treated as misses by the caller.
//! - [`ResponseCache`]: the in-memory moka implementation.

pub mod response;

pub use response::{CacheConfig, ResponseCache};

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;

use crate::context::canonical_statistics;
use crate::error::CacheError;
use crate::types::{AiResponse, AnalysisMode, Statistics};

/// Cache key for one (question, mode, statistics) triple.
///
/// The question is lowercased and trimmed; statistics are rendered at the
/// same fixed precision the prompts use, so two records that render the
/// same prompt share a key. The hash is stable within a process, which is
/// all an in-memory cache needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub fn new(question: &str, mode: AnalysisMode, statistics: &Statistics) -> Self {
        let mut hasher = DefaultHasher::new();
        question.trim().to_lowercase().hash(&mut hasher);
        mode.hash(&mut hasher);
        canonical_statistics(statistics).hash(&mut hasher);
        Fingerprint(hasher.finish())
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Storage for cached answers.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &Fingerprint) -> Result<Option<AiResponse>, CacheError>;

    async fn insert(&self, key: Fingerprint, value: AiResponse) -> Result<(), CacheError>;
}
