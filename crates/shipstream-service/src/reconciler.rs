//! Reconciliation sweep.
//!
//! The queue is lossy by design: a publish can fail after the ledger
//! commit, and a worker can die holding an in-flight message. The sweep
//! walks both gaps on an interval and re-publishes what fell through,
//! leaving job status untouched.

use shipstream_config::ReconcilerConfig;
use shipstream_core::{JobStatus, ShipstreamResult};
use shipstream_jobs::{DispatchMessage, DispatchQueue};
use shipstream_repository::JobLedger;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// What one sweep run accomplished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Expired in-flight messages returned to the pending queue.
    pub redelivered: u64,
    /// Stale queued jobs republished from the ledger.
    pub republished: u64,
}

/// Background task that repairs the ledger/queue gap.
pub struct ReconciliationSweep<L: JobLedger> {
    ledger: Arc<L>,
    queue: Arc<dyn DispatchQueue>,
    config: ReconcilerConfig,
}

impl<L: JobLedger + 'static> ReconciliationSweep<L> {
    /// Creates a new sweep.
    pub fn new(ledger: Arc<L>, queue: Arc<dyn DispatchQueue>, config: ReconcilerConfig) -> Self {
        Self {
            ledger,
            queue,
            config,
        }
    }

    /// Runs one sweep pass.
    ///
    /// Each stale job is republished at most once per pass; duplicate
    /// deliveries are acceptable, dropped jobs are not.
    pub async fn run_once(&self) -> ShipstreamResult<SweepReport> {
        let redelivered = self.queue.redeliver_expired().await.map_err(|e| {
            warn!(error = %e, "Sweep could not redeliver expired messages");
            shipstream_core::ShipstreamError::from(e)
        })?;

        let stale = self
            .ledger
            .list_stale(
                self.config.grace(),
                JobStatus::Queued,
                self.config.max_republish_per_sweep,
            )
            .await?;

        let mut republished = 0u64;
        for job in &stale {
            let message = DispatchMessage::for_job(job);
            match self.queue.publish(&message).await {
                Ok(()) => {
                    republished += 1;
                    debug!(job_id = %job.id, "Republished stale job");
                }
                Err(e) => {
                    // Try again next pass rather than aborting the sweep.
                    warn!(job_id = %job.id, error = %e, "Republish failed");
                }
            }
        }

        let report = SweepReport {
            redelivered,
            republished,
        };

        if report.redelivered > 0 || report.republished > 0 {
            info!(
                redelivered = report.redelivered,
                republished = report.republished,
                "Reconciliation sweep repaired messages"
            );
        }

        Ok(report)
    }

    /// Runs the sweep on its configured interval until shutdown.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.config.sweep_interval());
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!(
            interval_secs = self.config.sweep_interval_secs,
            grace_secs = self.config.grace_secs,
            "Reconciliation sweep started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_once().await {
                        warn!(error = %e, "Reconciliation sweep pass failed");
                    }
                }
                changed = shutdown.changed() => {
                    // A dropped sender counts as shutdown; otherwise the
                    // select would spin on the closed channel.
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Reconciliation sweep stopping");
                        break;
                    }
                }
            }
        }
    }
}

impl<L: JobLedger> std::fmt::Debug for ReconciliationSweep<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconciliationSweep")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
