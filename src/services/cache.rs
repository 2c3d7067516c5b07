use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// In-process TTL cache for worker lookups
///
/// Values are stored as JSON bytes so any serializable record can share one
/// cache. Entries expire after the configured TTL or when a write invalidates
/// them.
pub struct CacheManager {
    l1_cache: moka::future::Cache<String, Vec<u8>>,
}

impl CacheManager {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let l1_cache = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { l1_cache }
    }

    /// Get a value from cache, `None` on a miss
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        match self.l1_cache.get(key).await {
            Some(bytes) => {
                tracing::trace!("Cache hit: {}", key);
                Ok(Some(serde_json::from_slice(&bytes)?))
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                Ok(None)
            }
        }
    }

    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.l1_cache.insert(key.to_string(), bytes).await;

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    pub async fn delete(&self, key: &str) {
        self.l1_cache.invalidate(key).await;
    }

    /// Drop every entry
    pub fn invalidate_all(&self) {
        self.l1_cache.invalidate_all();
        tracing::debug!("Invalidated worker cache");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.l1_cache.entry_count(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entry_count: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for the full worker roster
    pub fn roster() -> String {
        "psws:all".to_string()
    }

    /// Key for a single worker profile
    pub fn worker(id: &str) -> String {
        format!("psw:{}", id)
    }
}
