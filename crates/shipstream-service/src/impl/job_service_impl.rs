//! Job service implementation.

use crate::cache::StatusCache;
use crate::dto::{
    PollResponse, ShipmentRecordResponse, StatusResponse, SubmitJobRequest, SubmitJobResponse,
};
use crate::job_service::JobService;
use async_trait::async_trait;
use shipstream_core::{
    JobId, JobStatus, SearchJob, ShipstreamError, ShipstreamResult, TenantId, ValidateExt,
};
use shipstream_jobs::{DispatchMessage, DispatchQueue};
use shipstream_repository::JobLedger;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Job service backed by the ledger, dispatch queue, and status cache.
pub struct JobServiceImpl<L: JobLedger> {
    ledger: Arc<L>,
    queue: Arc<dyn DispatchQueue>,
    cache: Arc<dyn StatusCache>,
}

impl<L: JobLedger> JobServiceImpl<L> {
    /// Creates a new job service.
    pub fn new(ledger: Arc<L>, queue: Arc<dyn DispatchQueue>, cache: Arc<dyn StatusCache>) -> Self {
        Self {
            ledger,
            queue,
            cache,
        }
    }
}

#[async_trait]
impl<L: JobLedger + 'static> JobService for JobServiceImpl<L> {
    async fn submit(&self, request: SubmitJobRequest) -> ShipstreamResult<SubmitJobResponse> {
        debug!("Submitting job for tenant: {}", request.tenant_id);

        request.validate_request()?;

        let tenant = TenantId::parse(&request.tenant_id)
            .map_err(|e| ShipstreamError::validation(format!("Invalid tenant id: {}", e)))?;
        let mode = request.parse_mode()?;

        let job = SearchJob::new(tenant, request.pattern.trim().to_string(), mode);

        // Commit before publish: the ledger row must exist before any
        // worker can see the message.
        self.ledger.insert_job(&job).await?;

        let message = DispatchMessage::for_job(&job);
        if let Err(e) = self.queue.publish(&message).await {
            // The submission already succeeded durably; the job stays
            // QUEUED and the reconciliation sweep republishes it.
            warn!(job_id = %job.id, error = %e, "Dispatch publish failed; job awaits sweep");
        }

        if let Err(e) = self.cache.set_status(job.id, JobStatus::Queued).await {
            debug!(job_id = %job.id, error = %e, "Status cache write failed");
        }

        info!(job_id = %job.id, tenant_id = %tenant, "Job accepted");

        Ok(SubmitJobResponse {
            job_id: job.id,
            status: JobStatus::Queued,
        })
    }

    async fn poll(&self, id: JobId, tenant: TenantId) -> ShipstreamResult<PollResponse> {
        debug!("Polling job: {}", id);

        let Some(job) = self.ledger.find_job(id).await? else {
            // Unknown id looks the same as a job not yet visible.
            return Ok(PollResponse {
                job_id: id,
                status: None,
                results: vec![],
            });
        };

        if job.tenant_id != tenant {
            return Err(ShipstreamError::forbidden(format!(
                "Job {} does not belong to tenant {}",
                id, tenant
            )));
        }

        let results = self
            .ledger
            .results_for_job(id)
            .await?
            .into_iter()
            .map(ShipmentRecordResponse::from)
            .collect();

        Ok(PollResponse {
            job_id: id,
            status: Some(job.status),
            results,
        })
    }

    async fn status(&self, id: JobId) -> ShipstreamResult<StatusResponse> {
        // Cache errors read as misses; the ledger answers either way.
        let cached = match self.cache.get_status(id).await {
            Ok(status) => status,
            Err(e) => {
                debug!(job_id = %id, error = %e, "Status cache read failed");
                None
            }
        };

        if let Some(status) = cached {
            return Ok(StatusResponse {
                job_id: id,
                status: Some(status),
            });
        }

        let status = self.ledger.job_status(id).await?;

        if let Some(status) = status {
            if let Err(e) = self.cache.set_status(id, status).await {
                debug!(job_id = %id, error = %e, "Status cache backfill failed");
            }
        }

        Ok(StatusResponse { job_id: id, status })
    }
}

impl<L: JobLedger> std::fmt::Debug for JobServiceImpl<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobServiceImpl").finish_non_exhaustive()
    }
}
