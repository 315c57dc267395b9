//! Job service trait.

use crate::dto::{PollResponse, StatusResponse, SubmitJobRequest, SubmitJobResponse};
use async_trait::async_trait;
use shipstream_core::{JobId, ShipstreamResult, TenantId};

/// Submission and polling operations for search jobs.
#[async_trait]
pub trait JobService: Send + Sync {
    /// Accepts a new search job.
    ///
    /// The job is committed to the ledger before anything is published to
    /// the dispatch queue; a publish failure does not fail the submission.
    async fn submit(&self, request: SubmitJobRequest) -> ShipstreamResult<SubmitJobResponse>;

    /// Returns the job status and all results written so far.
    ///
    /// Fails with `Forbidden` when the job belongs to a different tenant.
    async fn poll(&self, id: JobId, tenant: TenantId) -> ShipstreamResult<PollResponse>;

    /// Returns just the job status, served from the status cache when
    /// possible.
    async fn status(&self, id: JobId) -> ShipstreamResult<StatusResponse>;
}
