//! PostgreSQL job ledger implementation.

use crate::{traits::JobLedger, LedgerPool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shipstream_core::{
    JobId, JobStatus, NewShipmentRecord, SearchJob, ShipmentRecord, ShipstreamError,
    ShipstreamResult, TenantId,
};
use sqlx::FromRow;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// PostgreSQL job ledger implementation.
#[derive(Clone)]
pub struct PgJobLedger {
    pool: Arc<LedgerPool>,
}

impl PgJobLedger {
    /// Creates a new PostgreSQL job ledger.
    #[must_use]
    pub fn new(pool: Arc<LedgerPool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a search job.
#[derive(Debug, FromRow)]
struct JobRow {
    id: Uuid,
    tenant_id: Uuid,
    search_pattern: String,
    mode: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for SearchJob {
    type Error = ShipstreamError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|e: String| ShipstreamError::Internal(format!("Invalid status in ledger: {}", e)))?;
        let mode = row
            .mode
            .parse()
            .map_err(|e: String| ShipstreamError::Internal(format!("Invalid mode in ledger: {}", e)))?;

        Ok(SearchJob {
            id: JobId::from_uuid(row.id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            pattern: row.search_pattern,
            mode,
            status,
            created_at: row.created_at,
        })
    }
}

/// Database row representation of a shipment result.
#[derive(Debug, FromRow)]
struct ShipmentRow {
    id: i64,
    job_id: Uuid,
    reference_no: String,
    waybill_no: String,
    origin: String,
    destination: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<ShipmentRow> for ShipmentRecord {
    fn from(row: ShipmentRow) -> Self {
        Self {
            id: row.id,
            job_id: JobId::from_uuid(row.job_id),
            reference_no: row.reference_no,
            waybill_no: row.waybill_no,
            origin: row.origin,
            destination: row.destination,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl JobLedger for PgJobLedger {
    async fn insert_job(&self, job: &SearchJob) -> ShipstreamResult<()> {
        debug!("Inserting job: {}", job.id);

        sqlx::query(
            r#"
            INSERT INTO search_jobs (id, tenant_id, search_pattern, mode, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(job.id.into_inner())
        .bind(job.tenant_id.into_inner())
        .bind(&job.pattern)
        .bind(job.mode.as_str())
        .bind(job.status.as_str())
        .bind(job.created_at)
        .execute(self.pool.inner())
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                ShipstreamError::DuplicateJob(job.id.to_string())
            }
            _ => ShipstreamError::LedgerWrite(e.to_string()),
        })?;

        Ok(())
    }

    async fn find_job(&self, id: JobId) -> ShipstreamResult<Option<SearchJob>> {
        debug!("Finding job by id: {}", id);

        let row = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, tenant_id, search_pattern, mode, status, created_at
            FROM search_jobs
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(SearchJob::try_from).transpose()
    }

    async fn job_status(&self, id: JobId) -> ShipstreamResult<Option<JobStatus>> {
        let status: Option<String> =
            sqlx::query_scalar("SELECT status FROM search_jobs WHERE id = $1")
                .bind(id.into_inner())
                .fetch_optional(self.pool.inner())
                .await?;

        status
            .map(|s| {
                s.parse().map_err(|e: String| {
                    ShipstreamError::Internal(format!("Invalid status in ledger: {}", e))
                })
            })
            .transpose()
    }

    async fn update_status(&self, id: JobId, status: JobStatus) -> ShipstreamResult<bool> {
        debug!("Updating job {} status to {}", id, status);

        let result = sqlx::query("UPDATE search_jobs SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await
            .map_err(|e| ShipstreamError::LedgerWrite(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_results(
        &self,
        id: JobId,
        records: &[NewShipmentRecord],
    ) -> ShipstreamResult<u64> {
        debug!("Inserting {} results for job {}", records.len(), id);

        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = self
            .pool
            .inner()
            .begin()
            .await
            .map_err(|e| ShipstreamError::LedgerWrite(e.to_string()))?;

        let mut written = 0u64;
        for record in records {
            let result = sqlx::query(
                r#"
                INSERT INTO shipments (job_id, reference_no, waybill_no, origin, destination, status)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT ON CONSTRAINT uq_shipments_job_ref_waybill DO NOTHING
                "#,
            )
            .bind(id.into_inner())
            .bind(&record.reference_no)
            .bind(&record.waybill_no)
            .bind(&record.origin)
            .bind(&record.destination)
            .bind(&record.status)
            .execute(&mut *tx)
            .await
            .map_err(|e| ShipstreamError::LedgerWrite(e.to_string()))?;

            written += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| ShipstreamError::LedgerWrite(e.to_string()))?;

        Ok(written)
    }

    async fn results_for_job(&self, id: JobId) -> ShipstreamResult<Vec<ShipmentRecord>> {
        debug!("Fetching results for job: {}", id);

        let rows = sqlx::query_as::<_, ShipmentRow>(
            r#"
            SELECT id, job_id, reference_no, waybill_no, origin, destination, status, created_at
            FROM shipments
            WHERE job_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(ShipmentRecord::from).collect())
    }

    async fn list_stale(
        &self,
        older_than: Duration,
        status: JobStatus,
        limit: u32,
    ) -> ShipstreamResult<Vec<SearchJob>> {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(older_than)
                .map_err(|e| ShipstreamError::Internal(format!("Invalid duration: {}", e)))?;

        debug!("Listing jobs in status {} older than {}", status, cutoff);

        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, tenant_id, search_pattern, mode, status, created_at
            FROM search_jobs
            WHERE status = $1 AND created_at < $2
            ORDER BY created_at ASC
            LIMIT $3
            "#,
        )
        .bind(status.as_str())
        .bind(cutoff)
        .bind(i64::from(limit))
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter().map(SearchJob::try_from).collect()
    }
}

impl std::fmt::Debug for PgJobLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgJobLedger").finish_non_exhaustive()
    }
}
