//! Destructive maintenance operations for the ledger.

use crate::LedgerPool;
use shipstream_core::{ShipstreamError, ShipstreamResult};
use tracing::warn;

/// Drops and recreates the ledger tables.
///
/// Development and test tool only; guarded behind the admin surface,
/// which is disabled by default.
pub async fn reset_schema(pool: &LedgerPool) -> ShipstreamResult<()> {
    warn!("Resetting ledger schema: all jobs and shipments will be dropped");

    sqlx::query("DROP TABLE IF EXISTS shipments")
        .execute(pool.inner())
        .await
        .map_err(|e| ShipstreamError::LedgerWrite(e.to_string()))?;

    sqlx::query("DROP TABLE IF EXISTS search_jobs")
        .execute(pool.inner())
        .await
        .map_err(|e| ShipstreamError::LedgerWrite(e.to_string()))?;

    sqlx::query("DROP TABLE IF EXISTS _sqlx_migrations")
        .execute(pool.inner())
        .await
        .map_err(|e| ShipstreamError::LedgerWrite(e.to_string()))?;

    pool.run_migrations().await?;

    warn!("Ledger schema reset complete");
    Ok(())
}
