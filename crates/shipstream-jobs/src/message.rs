//! Dispatch message format.

use crate::error::QueueResult;
use serde::{Deserialize, Serialize};
use shipstream_core::{JobId, SearchJob, SearchMode, TenantId};
use std::fmt::{self, Display};
use uuid::Uuid;

/// Message published to the dispatch queue for each submitted job.
///
/// Self-contained: workers act on the message alone without a ledger
/// read. Field names are part of the wire contract with the workers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchMessage {
    /// Job id, echoed back by the worker on status writes.
    pub job_id: JobId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Pattern to search for.
    pub pattern: String,
    /// Search mode.
    pub mode: SearchMode,
}

impl DispatchMessage {
    /// Builds a dispatch message for a ledger job.
    #[must_use]
    pub fn for_job(job: &SearchJob) -> Self {
        Self {
            job_id: job.id,
            tenant_id: job.tenant_id,
            pattern: job.pattern.clone(),
            mode: job.mode,
        }
    }

    /// Serializes the message to its wire form.
    pub fn to_json(&self) -> QueueResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserializes a message from its wire form.
    pub fn from_json(json: &str) -> QueueResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Opaque receipt handed out by `consume`, required to acknowledge.
///
/// A token is valid for exactly one delivery; after redelivery the old
/// token no longer acknowledges anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AckToken(Uuid);

impl AckToken {
    /// Creates a fresh token.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a token from a string.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for AckToken {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for AckToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A consumed message together with its acknowledge token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub message: DispatchMessage,
    pub token: AckToken,
}
