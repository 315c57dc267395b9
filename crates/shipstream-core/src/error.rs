//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Shipstream.
///
/// Each variant corresponds to one failure class of the submission and
/// fulfillment pipeline, with a stable HTTP status and machine-readable code.
#[derive(Error, Debug)]
pub enum ShipstreamError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate job id on insert; the ledger rejects rather than overwrites.
    #[error("Duplicate job: {0}")]
    DuplicateJob(String),

    /// Tenant mismatch on a read path.
    #[error("Not authorized: {0}")]
    Forbidden(String),

    // ============ Infrastructure Errors ============
    /// Ledger write failed; nothing was published to the queue.
    #[error("Ledger write error: {0}")]
    LedgerWrite(String),

    /// Ledger read failed; safe to retry, caller should re-poll.
    #[error("Ledger read error: {0}")]
    LedgerRead(String),

    /// Queue publish failed after the ledger commit. Never surfaced to the
    /// submitting caller as a failure; the reconciliation sweep recovers it.
    #[error("Queue publish error: {0}")]
    QueuePublish(String),

    /// Status cache error. Advisory path only, never fatal.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShipstreamError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::DuplicateJob(_) => 409,
            Self::Forbidden(_) => 403,
            Self::Timeout(_) => 503,
            Self::LedgerWrite(_)
            | Self::LedgerRead(_)
            | Self::QueuePublish(_)
            | Self::Cache(_)
            | Self::Configuration(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::DuplicateJob(_) => "DUPLICATE_JOB",
            Self::Forbidden(_) => "NOT_AUTHORIZED",
            Self::LedgerWrite(_) => "LEDGER_WRITE_ERROR",
            Self::LedgerRead(_) => "POLL_READ_ERROR",
            Self::QueuePublish(_) => "QUEUE_PUBLISH_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not-authorized error.
    #[must_use]
    pub fn forbidden<T: Into<String>>(message: T) -> Self {
        Self::Forbidden(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is retriable.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::LedgerRead(_)
                | Self::QueuePublish(_)
                | Self::Cache(_)
                | Self::Timeout(_)
        )
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for ShipstreamError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                // PostgreSQL unique violation
                if let Some(code) = db_err.code() {
                    if code == "23505" {
                        return Self::DuplicateJob(db_err.message().to_string());
                    }
                }
                Self::LedgerRead(err.to_string())
            }
            sqlx::Error::PoolTimedOut => Self::Timeout("database pool".to_string()),
            _ => Self::LedgerRead(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ShipstreamError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `ShipstreamError`.
    #[must_use]
    pub fn from_error(error: &ShipstreamError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&ShipstreamError> for ErrorResponse {
    fn from(error: &ShipstreamError) -> Self {
        Self::from_error(error)
    }
}
