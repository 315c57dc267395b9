//! Redis dispatch queue implementation.

use super::QueueKeys;
use crate::error::{QueueError, QueueResult};
use crate::message::{AckToken, Delivery, DispatchMessage};
use crate::queue::DispatchQueue;
use async_trait::async_trait;
use chrono::Utc;
use deadpool_redis::Pool;
use redis::AsyncCommands;
use shipstream_config::{QueueConfig, RedisConfig};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Redis-backed dispatch queue.
///
/// Pending messages live in a sorted set scored by publish time, which
/// preserves publish order. Consuming moves the message body to a
/// per-token key and records the token in an in-flight sorted set scored
/// by its visibility deadline.
pub struct RedisDispatchQueue {
    pool: Pool,
    keys: QueueKeys,
    visibility_timeout: Duration,
}

impl RedisDispatchQueue {
    /// Create a new Redis dispatch queue.
    #[must_use]
    pub fn new(pool: Pool, redis: &RedisConfig, queue: &QueueConfig) -> Self {
        Self {
            pool,
            keys: QueueKeys::new(&redis.key_prefix),
            visibility_timeout: queue.visibility_timeout(),
        }
    }

    /// Get a connection from the pool.
    async fn conn(&self) -> QueueResult<deadpool_redis::Connection> {
        Ok(self.pool.get().await?)
    }

    fn deadline_ms(&self) -> i64 {
        Utc::now().timestamp_millis() + self.visibility_timeout.as_millis() as i64
    }
}

#[async_trait]
impl DispatchQueue for RedisDispatchQueue {
    async fn publish(&self, message: &DispatchMessage) -> QueueResult<()> {
        let json = message.to_json()?;
        let score = Utc::now().timestamp_millis() as f64;

        let mut conn = self.conn().await?;
        let _: () = conn.zadd(&self.keys.pending(), &json, score).await?;

        debug!(job_id = %message.job_id, "Published dispatch message");
        Ok(())
    }

    async fn consume(&self) -> QueueResult<Option<Delivery>> {
        let mut conn = self.conn().await?;

        // ZPOPMIN atomically takes the oldest pending message.
        let popped: Vec<(String, f64)> = conn.zpopmin(&self.keys.pending(), 1).await?;

        let Some((json, _score)) = popped.into_iter().next() else {
            return Ok(None);
        };

        let message = match DispatchMessage::from_json(&json) {
            Ok(message) => message,
            Err(e) => {
                // A message that cannot be parsed is dropped rather than
                // redelivered forever; the sweep recovers the job.
                error!(error = %e, "Dropping malformed dispatch message");
                return Ok(None);
            }
        };

        let token = AckToken::new();
        let deadline = self.deadline_ms();

        let _: () = redis::pipe()
            .set(self.keys.message(&token.to_string()), &json)
            .zadd(&self.keys.in_flight(), token.to_string(), deadline)
            .query_async(&mut *conn)
            .await?;

        debug!(job_id = %message.job_id, token = %token, "Consumed dispatch message");

        Ok(Some(Delivery { message, token }))
    }

    async fn acknowledge(&self, token: AckToken) -> QueueResult<bool> {
        let mut conn = self.conn().await?;

        let removed: u64 = conn
            .zrem(&self.keys.in_flight(), token.to_string())
            .await?;
        let _: () = conn.del(self.keys.message(&token.to_string())).await?;

        if removed > 0 {
            debug!(token = %token, "Acknowledged delivery");
        } else {
            debug!(token = %token, "Acknowledge for unknown or expired token");
        }

        Ok(removed > 0)
    }

    async fn redeliver_expired(&self) -> QueueResult<u64> {
        let mut conn = self.conn().await?;
        let now = Utc::now().timestamp_millis();

        let expired: Vec<String> = conn
            .zrangebyscore(&self.keys.in_flight(), 0i64, now)
            .await?;

        let mut redelivered = 0u64;

        for token in expired {
            let message_key = self.keys.message(&token);
            let json: Option<String> = conn.get(&message_key).await?;

            if let Some(json) = json {
                let score = Utc::now().timestamp_millis() as f64;
                let _: () = redis::pipe()
                    .zadd(&self.keys.pending(), &json, score)
                    .zrem(&self.keys.in_flight(), &token)
                    .del(&message_key)
                    .query_async(&mut *conn)
                    .await?;

                redelivered += 1;
                warn!(token = %token, "Redelivered expired in-flight message");
            } else {
                // Body already gone; drop the orphaned token.
                let _: () = conn.zrem(&self.keys.in_flight(), &token).await?;
            }
        }

        if redelivered > 0 {
            info!(count = redelivered, "Redelivered expired messages");
        }

        Ok(redelivered)
    }

    async fn len(&self) -> QueueResult<u64> {
        let mut conn = self.conn().await?;
        let count: u64 = conn.zcard(&self.keys.pending()).await?;
        Ok(count)
    }

    async fn purge(&self) -> QueueResult<u64> {
        let mut conn = self.conn().await?;

        let pending: u64 = conn.zcard(&self.keys.pending()).await?;
        let in_flight: u64 = conn.zcard(&self.keys.in_flight()).await?;

        let _: () = conn.del(&self.keys.pending()).await?;
        let _: () = conn.del(&self.keys.in_flight()).await?;

        let message_keys: Vec<String> = conn.keys(self.keys.message_pattern()).await?;
        if !message_keys.is_empty() {
            let _: () = conn.del(&message_keys).await?;
        }

        let dropped = pending + in_flight;
        warn!(count = dropped, "Purged dispatch queue");

        Ok(dropped)
    }

    async fn health_check(&self) -> QueueResult<()> {
        let mut conn = self.conn().await?;
        let _: String = redis::cmd("PING").query_async(&mut *conn).await?;
        Ok(())
    }

    fn visibility_timeout(&self) -> Duration {
        self.visibility_timeout
    }
}

impl std::fmt::Debug for RedisDispatchQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisDispatchQueue")
            .field("visibility_timeout", &self.visibility_timeout)
            .finish_non_exhaustive()
    }
}
