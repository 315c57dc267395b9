//! Ledger trait definitions.

use async_trait::async_trait;
use shipstream_core::{
    JobId, JobStatus, NewShipmentRecord, SearchJob, ShipmentRecord, ShipstreamResult,
};
use std::time::Duration;

/// Durable store of search jobs and their shipment results.
///
/// Every submitted job is committed here before anything is published to
/// the dispatch queue. Job rows are never overwritten: a duplicate id on
/// insert is rejected with `DuplicateJob`.
#[async_trait]
pub trait JobLedger: Send + Sync {
    /// Inserts a new job. Fails with `DuplicateJob` if the id already exists.
    async fn insert_job(&self, job: &SearchJob) -> ShipstreamResult<()>;

    /// Finds a job by id.
    async fn find_job(&self, id: JobId) -> ShipstreamResult<Option<SearchJob>>;

    /// Returns just the status of a job, if it exists.
    async fn job_status(&self, id: JobId) -> ShipstreamResult<Option<JobStatus>>;

    /// Updates the status of a job. Returns false when no such job exists.
    async fn update_status(&self, id: JobId, status: JobStatus) -> ShipstreamResult<bool>;

    /// Appends shipment results for a job in one transaction.
    ///
    /// Rows that would duplicate an existing (job, reference, waybill)
    /// triple are skipped. Returns the number of rows actually written.
    async fn insert_results(
        &self,
        id: JobId,
        records: &[NewShipmentRecord],
    ) -> ShipstreamResult<u64>;

    /// Returns all shipment results for a job in insertion order.
    async fn results_for_job(&self, id: JobId) -> ShipstreamResult<Vec<ShipmentRecord>>;

    /// Lists jobs in the given status that are older than `older_than`,
    /// oldest first, up to `limit` rows. Used by the reconciliation sweep.
    async fn list_stale(
        &self,
        older_than: Duration,
        status: JobStatus,
        limit: u32,
    ) -> ShipstreamResult<Vec<SearchJob>>;
}
