//! Status cache trait.

use async_trait::async_trait;
use shipstream_core::{JobId, JobStatus, ShipstreamResult};

/// Advisory cache of job statuses.
///
/// The cache may lag, miss, or be entirely absent; callers always fall
/// back to the ledger. Nothing correctness-critical may depend on it.
#[async_trait]
pub trait StatusCache: Send + Sync {
    /// Returns true when a backing store is configured.
    fn is_enabled(&self) -> bool;

    /// Looks up a cached status.
    async fn get_status(&self, id: JobId) -> ShipstreamResult<Option<JobStatus>>;

    /// Stores a status with the configured TTL.
    async fn set_status(&self, id: JobId, status: JobStatus) -> ShipstreamResult<()>;

    /// Drops a cached status. Returns true when an entry was removed.
    async fn delete_status(&self, id: JobId) -> ShipstreamResult<bool>;
}
