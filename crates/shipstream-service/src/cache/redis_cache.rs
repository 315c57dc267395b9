//! Redis-based status cache implementation.

use super::{cache_keys, StatusCache};
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool};
use shipstream_core::{JobId, JobStatus, ShipstreamError, ShipstreamResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default TTL for cached statuses (1 hour).
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Redis-based status cache.
pub struct RedisStatusCache {
    /// Redis connection pool.
    pool: Option<Arc<Pool>>,
    /// TTL for cached statuses.
    ttl: Duration,
}

impl RedisStatusCache {
    /// Create a new Redis status cache.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self {
            pool: Some(pool),
            ttl: DEFAULT_TTL,
        }
    }

    /// Create a status cache with a custom TTL.
    #[must_use]
    pub fn with_ttl(pool: Arc<Pool>, ttl: Duration) -> Self {
        Self {
            pool: Some(pool),
            ttl,
        }
    }

    /// Create a no-op cache (for when Redis caching is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            pool: None,
            ttl: DEFAULT_TTL,
        }
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> ShipstreamResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                ShipstreamError::Cache(format!("Failed to get Redis connection: {}", e))
            }),
            None => Err(ShipstreamError::Cache("Cache is disabled".to_string())),
        }
    }
}

#[async_trait]
impl StatusCache for RedisStatusCache {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_status(&self, id: JobId) -> ShipstreamResult<Option<JobStatus>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let key = cache_keys::job_status(id);
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| ShipstreamError::Cache(format!("Failed to get key '{}': {}", key, e)))?;

        match value {
            Some(raw) => {
                debug!("Cache hit for key '{}'", key);
                // A corrupt entry reads as a miss.
                Ok(raw.parse().ok())
            }
            None => {
                debug!("Cache miss for key '{}'", key);
                Ok(None)
            }
        }
    }

    async fn set_status(&self, id: JobId, status: JobStatus) -> ShipstreamResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let key = cache_keys::job_status(id);
        let mut conn = self.get_conn().await?;
        let ttl_secs = self.ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(&key, status.as_str(), ttl_secs)
            .await
            .map_err(|e| ShipstreamError::Cache(format!("Failed to set key '{}': {}", key, e)))?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn delete_status(&self, id: JobId) -> ShipstreamResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let key = cache_keys::job_status(id);
        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(&key)
            .await
            .map_err(|e| ShipstreamError::Cache(format!("Failed to delete key '{}': {}", key, e)))?;

        Ok(deleted > 0)
    }
}

impl std::fmt::Debug for RedisStatusCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStatusCache")
            .field("enabled", &self.is_enabled())
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_cache() {
        let cache = RedisStatusCache::disabled();
        assert!(!cache.is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_cache_reads_as_miss() {
        let cache = RedisStatusCache::disabled();
        let status = cache.get_status(JobId::new()).await.unwrap();
        assert!(status.is_none());
    }

    #[tokio::test]
    async fn test_disabled_cache_writes_are_no_ops() {
        let cache = RedisStatusCache::disabled();
        cache
            .set_status(JobId::new(), JobStatus::Queued)
            .await
            .unwrap();
        assert!(!cache.delete_status(JobId::new()).await.unwrap());
    }
}
