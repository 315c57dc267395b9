//! Dispatch queue trait.

use crate::error::QueueResult;
use crate::message::{AckToken, Delivery, DispatchMessage};
use async_trait::async_trait;
use std::time::Duration;

/// At-least-once delivery channel between ingest and the workers.
///
/// Publish order is preserved for pending messages; a consumed message
/// stays invisible until it is acknowledged or its visibility timeout
/// expires, after which `redeliver_expired` makes it consumable again.
/// Consumers must tolerate duplicate deliveries.
#[async_trait]
pub trait DispatchQueue: Send + Sync {
    /// Appends a message to the pending queue.
    async fn publish(&self, message: &DispatchMessage) -> QueueResult<()>;

    /// Takes the oldest pending message, if any.
    ///
    /// The message becomes in-flight and invisible to other consumers
    /// until acknowledged or until the visibility timeout expires.
    async fn consume(&self) -> QueueResult<Option<Delivery>>;

    /// Acknowledges a delivery, removing the message for good.
    ///
    /// Returns false when the token is unknown or already expired;
    /// acknowledging twice is a no-op, not an error.
    async fn acknowledge(&self, token: AckToken) -> QueueResult<bool>;

    /// Returns expired in-flight messages to the pending queue.
    ///
    /// Returns the number of messages redelivered.
    async fn redeliver_expired(&self) -> QueueResult<u64>;

    /// Number of pending (not in-flight) messages.
    async fn len(&self) -> QueueResult<u64>;

    /// Returns true when no messages are pending.
    async fn is_empty(&self) -> QueueResult<bool> {
        Ok(self.len().await? == 0)
    }

    /// Drops all pending and in-flight messages.
    ///
    /// Maintenance operation; returns the number of messages dropped.
    async fn purge(&self) -> QueueResult<u64>;

    /// Checks queue backend connectivity.
    async fn health_check(&self) -> QueueResult<()>;

    /// The configured visibility timeout.
    fn visibility_timeout(&self) -> Duration;
}
