//! In-memory fakes shared by the service-layer tests.

use crate::cache::StatusCache;
use async_trait::async_trait;
use shipstream_core::{
    JobId, JobStatus, NewShipmentRecord, SearchJob, ShipmentRecord, ShipstreamError,
    ShipstreamResult,
};
use shipstream_jobs::{
    AckToken, Delivery, DispatchMessage, DispatchQueue, QueueError, QueueResult,
};
use shipstream_repository::JobLedger;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory ledger with switchable write failures.
#[derive(Default)]
pub struct MemoryLedger {
    jobs: Mutex<HashMap<JobId, SearchJob>>,
    results: Mutex<HashMap<JobId, Vec<ShipmentRecord>>>,
    pub fail_writes: AtomicBool,
    pub status_reads: AtomicUsize,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    pub fn stored_job(&self, id: JobId) -> Option<SearchJob> {
        self.jobs.lock().unwrap().get(&id).cloned()
    }

    /// Ages a job so it shows up in `list_stale`.
    pub fn backdate_job(&self, id: JobId, by: Duration) {
        let mut jobs = self.jobs.lock().unwrap();
        if let Some(job) = jobs.get_mut(&id) {
            job.created_at -= chrono::Duration::from_std(by).unwrap();
        }
    }
}

#[async_trait]
impl JobLedger for MemoryLedger {
    async fn insert_job(&self, job: &SearchJob) -> ShipstreamResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ShipstreamError::LedgerWrite("ledger down".to_string()));
        }
        let mut jobs = self.jobs.lock().unwrap();
        if jobs.contains_key(&job.id) {
            return Err(ShipstreamError::DuplicateJob(job.id.to_string()));
        }
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn find_job(&self, id: JobId) -> ShipstreamResult<Option<SearchJob>> {
        Ok(self.jobs.lock().unwrap().get(&id).cloned())
    }

    async fn job_status(&self, id: JobId) -> ShipstreamResult<Option<JobStatus>> {
        self.status_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.jobs.lock().unwrap().get(&id).map(|j| j.status))
    }

    async fn update_status(&self, id: JobId, status: JobStatus) -> ShipstreamResult<bool> {
        let mut jobs = self.jobs.lock().unwrap();
        match jobs.get_mut(&id) {
            Some(job) => {
                job.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_results(
        &self,
        id: JobId,
        records: &[NewShipmentRecord],
    ) -> ShipstreamResult<u64> {
        let mut results = self.results.lock().unwrap();
        let rows = results.entry(id).or_default();
        let mut written = 0u64;
        for record in records {
            let duplicate = rows
                .iter()
                .any(|r| r.reference_no == record.reference_no && r.waybill_no == record.waybill_no);
            if duplicate {
                continue;
            }
            rows.push(ShipmentRecord {
                id: rows.len() as i64 + 1,
                job_id: id,
                reference_no: record.reference_no.clone(),
                waybill_no: record.waybill_no.clone(),
                origin: record.origin.clone(),
                destination: record.destination.clone(),
                status: record.status.clone(),
                created_at: chrono::Utc::now(),
            });
            written += 1;
        }
        Ok(written)
    }

    async fn results_for_job(&self, id: JobId) -> ShipstreamResult<Vec<ShipmentRecord>> {
        Ok(self.results.lock().unwrap().get(&id).cloned().unwrap_or_default())
    }

    async fn list_stale(
        &self,
        older_than: Duration,
        status: JobStatus,
        limit: u32,
    ) -> ShipstreamResult<Vec<SearchJob>> {
        let cutoff = chrono::Utc::now() - chrono::Duration::from_std(older_than).unwrap();
        let mut stale: Vec<SearchJob> = self
            .jobs
            .lock()
            .unwrap()
            .values()
            .filter(|j| j.status == status && j.created_at < cutoff)
            .cloned()
            .collect();
        stale.sort_by_key(|j| j.created_at);
        stale.truncate(limit as usize);
        Ok(stale)
    }
}

/// In-memory dispatch queue with switchable publish failures.
#[derive(Default)]
pub struct MemoryQueue {
    pending: Mutex<VecDeque<DispatchMessage>>,
    in_flight: Mutex<HashMap<AckToken, DispatchMessage>>,
    pub fail_publish: AtomicBool,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_messages(&self) -> Vec<DispatchMessage> {
        self.pending.lock().unwrap().iter().cloned().collect()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().unwrap().len()
    }
}

#[async_trait]
impl DispatchQueue for MemoryQueue {
    async fn publish(&self, message: &DispatchMessage) -> QueueResult<()> {
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(QueueError::Internal("queue down".to_string()));
        }
        self.pending.lock().unwrap().push_back(message.clone());
        Ok(())
    }

    async fn consume(&self) -> QueueResult<Option<Delivery>> {
        let Some(message) = self.pending.lock().unwrap().pop_front() else {
            return Ok(None);
        };
        let token = AckToken::new();
        self.in_flight.lock().unwrap().insert(token, message.clone());
        Ok(Some(Delivery { message, token }))
    }

    async fn acknowledge(&self, token: AckToken) -> QueueResult<bool> {
        Ok(self.in_flight.lock().unwrap().remove(&token).is_some())
    }

    async fn redeliver_expired(&self) -> QueueResult<u64> {
        // Every in-flight message counts as expired for test purposes.
        let mut in_flight = self.in_flight.lock().unwrap();
        let count = in_flight.len() as u64;
        let mut pending = self.pending.lock().unwrap();
        for (_, message) in in_flight.drain() {
            pending.push_back(message);
        }
        Ok(count)
    }

    async fn len(&self) -> QueueResult<u64> {
        Ok(self.pending.lock().unwrap().len() as u64)
    }

    async fn purge(&self) -> QueueResult<u64> {
        let pending = self.pending.lock().unwrap().drain(..).count() as u64;
        let in_flight = self.in_flight.lock().unwrap().drain().count() as u64;
        Ok(pending + in_flight)
    }

    async fn health_check(&self) -> QueueResult<()> {
        Ok(())
    }

    fn visibility_timeout(&self) -> Duration {
        Duration::from_secs(120)
    }
}

/// In-memory status cache with switchable failures.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<JobId, JobStatus>>,
    pub fail: AtomicBool,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, id: JobId) -> Option<JobStatus> {
        self.entries.lock().unwrap().get(&id).copied()
    }

    pub fn seed(&self, id: JobId, status: JobStatus) {
        self.entries.lock().unwrap().insert(id, status);
    }
}

#[async_trait]
impl StatusCache for MemoryCache {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get_status(&self, id: JobId) -> ShipstreamResult<Option<JobStatus>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ShipstreamError::Cache("cache down".to_string()));
        }
        Ok(self.entries.lock().unwrap().get(&id).copied())
    }

    async fn set_status(&self, id: JobId, status: JobStatus) -> ShipstreamResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ShipstreamError::Cache("cache down".to_string()));
        }
        self.entries.lock().unwrap().insert(id, status);
        Ok(())
    }

    async fn delete_status(&self, id: JobId) -> ShipstreamResult<bool> {
        Ok(self.entries.lock().unwrap().remove(&id).is_some())
    }
}
