//! Client-side completion poller.

use crate::dto::PollResponse;
use crate::job_service::JobService;
use shipstream_core::{JobId, ShipstreamResult, TenantId};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default interval between poll attempts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default number of poll attempts before giving up (two minutes at the
/// default interval).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// Outcome of waiting for a job.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// The job reached a terminal status.
    Completed(PollResponse),
    /// Attempts ran out; carries the last response seen.
    TimedOut(PollResponse),
}

/// Polls a job until it completes or the attempt budget runs out.
///
/// Convenience for batch clients and tests; interactive callers usually
/// poll the HTTP endpoint themselves.
pub struct JobPoller {
    service: Arc<dyn JobService>,
    interval: Duration,
    max_attempts: u32,
}

impl JobPoller {
    /// Creates a poller with default interval and attempt budget.
    #[must_use]
    pub fn new(service: Arc<dyn JobService>) -> Self {
        Self {
            service,
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides the poll interval.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Overrides the attempt budget.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Polls until the job is terminal or attempts are exhausted.
    pub async fn wait_for_completion(
        &self,
        id: JobId,
        tenant: TenantId,
    ) -> ShipstreamResult<PollOutcome> {
        let mut last = self.service.poll(id, tenant).await?;

        for attempt in 1..self.max_attempts {
            if last.is_complete() {
                debug!(job_id = %id, attempt, "Job completed");
                return Ok(PollOutcome::Completed(last));
            }

            tokio::time::sleep(self.interval).await;
            last = self.service.poll(id, tenant).await?;
        }

        if last.is_complete() {
            Ok(PollOutcome::Completed(last))
        } else {
            debug!(job_id = %id, attempts = self.max_attempts, "Poll budget exhausted");
            Ok(PollOutcome::TimedOut(last))
        }
    }
}

impl std::fmt::Debug for JobPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobPoller")
            .field("interval", &self.interval)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::SubmitJobRequest;
    use crate::r#impl::JobServiceImpl;
    use crate::testing::{MemoryCache, MemoryLedger, MemoryQueue};
    use shipstream_core::JobStatus;
    use shipstream_repository::JobLedger;

    const TENANT: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn service_with_ledger() -> (Arc<MemoryLedger>, Arc<dyn JobService>) {
        let ledger = Arc::new(MemoryLedger::new());
        let service: Arc<dyn JobService> = Arc::new(JobServiceImpl::new(
            ledger.clone(),
            Arc::new(MemoryQueue::new()),
            Arc::new(MemoryCache::new()),
        ));
        (ledger, service)
    }

    async fn submitted_job(service: &Arc<dyn JobService>) -> JobId {
        let response = service
            .submit(SubmitJobRequest {
                tenant_id: TENANT.to_string(),
                pattern: "123".to_string(),
                mode: None,
            })
            .await
            .unwrap();
        response.job_id
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_done_job_completes_on_first_poll() {
        let (ledger, service) = service_with_ledger();
        let id = submitted_job(&service).await;
        ledger.update_status(id, JobStatus::Done).await.unwrap();

        let poller = JobPoller::new(service);
        let outcome = poller
            .wait_for_completion(id, TenantId::parse(TENANT).unwrap())
            .await
            .unwrap();

        match outcome {
            PollOutcome::Completed(response) => {
                assert_eq!(response.status, Some(JobStatus::Done));
            }
            PollOutcome::TimedOut(_) => panic!("expected completion"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_mid_way() {
        let (ledger, service) = service_with_ledger();
        let id = submitted_job(&service).await;

        let updater = tokio::spawn({
            let ledger = ledger.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                ledger.update_status(id, JobStatus::Failed).await.unwrap();
            }
        });

        let poller = JobPoller::new(service);
        let outcome = poller
            .wait_for_completion(id, TenantId::parse(TENANT).unwrap())
            .await
            .unwrap();
        updater.await.unwrap();

        match outcome {
            PollOutcome::Completed(response) => {
                assert_eq!(response.status, Some(JobStatus::Failed));
            }
            PollOutcome::TimedOut(_) => panic!("expected completion"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_when_job_never_finishes() {
        let (_ledger, service) = service_with_ledger();
        let id = submitted_job(&service).await;

        let poller = JobPoller::new(service).with_max_attempts(5);
        let outcome = poller
            .wait_for_completion(id, TenantId::parse(TENANT).unwrap())
            .await
            .unwrap();

        match outcome {
            PollOutcome::TimedOut(last) => {
                assert_eq!(last.status, Some(JobStatus::Queued));
            }
            PollOutcome::Completed(_) => panic!("expected timeout"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_tenant_mismatch_surfaces_immediately() {
        let (_ledger, service) = service_with_ledger();
        let id = submitted_job(&service).await;

        let poller = JobPoller::new(service);
        let err = poller
            .wait_for_completion(id, TenantId::new())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_AUTHORIZED");
    }
}
