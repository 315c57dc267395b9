//! Dispatch queue error types.

use thiserror::Error;

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Queue-related errors.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Redis error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Redis pool error.
    #[error("Redis pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    /// Message not found for an acknowledge token.
    #[error("Message not found: {0}")]
    NotFound(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QueueError {
    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Redis(_) | Self::Pool(_))
    }
}

impl From<QueueError> for shipstream_core::ShipstreamError {
    fn from(err: QueueError) -> Self {
        // Publish failures on the submit path are logged and swallowed,
        // never converted; errors arriving here come from maintenance
        // operations (sweep, purge, health), so the generic codes apply.
        match &err {
            QueueError::Pool(_) => Self::Timeout(err.to_string()),
            QueueError::Configuration(_) => Self::Configuration(err.to_string()),
            _ => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_not_retryable() {
        assert!(!QueueError::NotFound("token".into()).is_retryable());
    }

    #[test]
    fn test_configuration_is_not_retryable() {
        assert!(!QueueError::Configuration("bad url".into()).is_retryable());
    }

    #[test]
    fn test_pool_errors_convert_to_retryable_timeout() {
        let err: shipstream_core::ShipstreamError =
            QueueError::Pool(deadpool_redis::PoolError::Closed).into();
        assert_eq!(err.error_code(), "TIMEOUT");
        assert!(err.is_retriable());
    }

    #[test]
    fn test_configuration_errors_keep_their_code() {
        let err: shipstream_core::ShipstreamError =
            QueueError::Configuration("bad url".into()).into();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_non_publish_failures_do_not_claim_publish() {
        let err: shipstream_core::ShipstreamError =
            QueueError::Internal("boom".into()).into();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }
}
