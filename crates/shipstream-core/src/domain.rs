//! Domain entities for the job submission and fulfillment pipeline.

use crate::{JobId, TenantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Maximum accepted length for a search pattern.
pub const MAX_PATTERN_LEN: usize = 64;

/// Lifecycle status of a search job.
///
/// Normal progression is `Queued -> Dispatched -> Done`; `Failed` is the
/// terminal error state. Stored in the ledger as upper-case strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Queued,
    Dispatched,
    Done,
    Failed,
}

impl JobStatus {
    /// Returns true when no further transitions are expected.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::Dispatched => "DISPATCHED",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        }
    }
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "QUEUED" => Ok(Self::Queued),
            "DISPATCHED" => Ok(Self::Dispatched),
            "DONE" => Ok(Self::Done),
            "FAILED" => Ok(Self::Failed),
            other => Err(format!("unknown job status: {}", other)),
        }
    }
}

/// Search mode: match on the waybill number or on the reference number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Waybill,
    Reference,
}

impl SearchMode {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Waybill => "waybill",
            Self::Reference => "reference",
        }
    }
}

impl Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "waybill" => Ok(Self::Waybill),
            // "ref" is the legacy short form used by older workers.
            "reference" | "ref" => Ok(Self::Reference),
            other => Err(format!("unknown search mode: {}", other)),
        }
    }
}

/// A search job: the durable record of one asynchronous lookup request.
///
/// Owned by the ledger. Created by ingest; status is mutated only through
/// the worker-facing write contract. Re-dispatch by the reconciliation
/// sweep does not change status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchJob {
    /// Globally unique job id, random and never reused.
    pub id: JobId,
    /// Owning tenant, used for authorization on reads.
    pub tenant_id: TenantId,
    /// The tracking pattern to search for.
    pub pattern: String,
    /// Search mode.
    pub mode: SearchMode,
    /// Lifecycle status.
    pub status: JobStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl SearchJob {
    /// Creates a new queued job with a fresh random id.
    #[must_use]
    pub fn new(tenant_id: TenantId, pattern: String, mode: SearchMode) -> Self {
        Self {
            id: JobId::new(),
            tenant_id,
            pattern,
            mode,
            status: JobStatus::Queued,
            created_at: Utc::now(),
        }
    }
}

/// A single matched shipment written back by the worker.
///
/// Immutable once written; ordered by insertion for a given job. Its
/// existence implies the owning job reached at least `Dispatched`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    /// Ledger-assigned row id.
    pub id: i64,
    /// Owning job.
    pub job_id: JobId,
    pub reference_no: String,
    pub waybill_no: String,
    pub origin: String,
    pub destination: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// A shipment match prior to insertion (no row id or timestamp yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShipmentRecord {
    pub reference_no: String,
    pub waybill_no: String,
    pub origin: String,
    pub destination: String,
    pub status: String,
}
