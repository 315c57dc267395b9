//! Redis-backed dispatch queue implementation.

mod queue;

pub use queue::RedisDispatchQueue;

use crate::error::{QueueError, QueueResult};
use deadpool_redis::{Config, Pool, Runtime};
use shipstream_config::RedisConfig;
use tracing::info;

/// Create a Redis connection pool.
pub async fn create_pool(config: &RedisConfig) -> QueueResult<Pool> {
    info!("Creating Redis connection pool for dispatch queue...");

    let pool = build_pool(config)?;

    // Test connection
    let mut conn = pool.get().await?;
    redis::cmd("PING").query_async::<String>(&mut *conn).await?;

    info!("Redis connection pool created successfully");

    Ok(pool)
}

/// Build the pool without touching the server.
///
/// Acquisition is bounded by the configured pool timeout so a saturated
/// pool surfaces as a retryable pool error rather than blocking callers.
pub fn build_pool(config: &RedisConfig) -> QueueResult<Pool> {
    let cfg = Config::from_url(&config.url);

    cfg.builder()
        .map_err(|e| QueueError::Configuration(format!("Invalid Redis config: {}", e)))?
        .max_size(config.pool_size)
        .wait_timeout(Some(config.pool_timeout()))
        .create_timeout(Some(config.pool_timeout()))
        .runtime(Runtime::Tokio1)
        .build()
        .map_err(|e| QueueError::Configuration(format!("Failed to create pool: {}", e)))
}

/// Redis key builder for the dispatch queue.
pub struct QueueKeys {
    prefix: String,
}

impl QueueKeys {
    /// Create a new key builder with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Pending messages (sorted set scored by publish time).
    pub fn pending(&self) -> String {
        format!("{}:dispatch:pending", self.prefix)
    }

    /// In-flight tokens (sorted set scored by visibility deadline).
    pub fn in_flight(&self) -> String {
        format!("{}:dispatch:inflight", self.prefix)
    }

    /// Stored message body for an in-flight token.
    pub fn message(&self, token: &str) -> String {
        format!("{}:dispatch:msg:{}", self.prefix, token)
    }

    /// Glob matching every stored message body.
    pub fn message_pattern(&self) -> String {
        format!("{}:dispatch:msg:*", self.prefix)
    }
}

impl Default for QueueKeys {
    fn default() -> Self {
        Self::new("shipstream")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_pool_needs_no_server() {
        // Construction only validates config; no connection is made.
        assert!(build_pool(&RedisConfig::default()).is_ok());
    }

    #[test]
    fn test_queue_keys() {
        let keys = QueueKeys::new("test");

        assert_eq!(keys.pending(), "test:dispatch:pending");
        assert_eq!(keys.in_flight(), "test:dispatch:inflight");
        assert_eq!(keys.message("abc"), "test:dispatch:msg:abc");
        assert_eq!(keys.message_pattern(), "test:dispatch:msg:*");
    }
}
