//! Admin controller: destructive maintenance operations.
//!
//! Mounted only when `admin.enabled` is set; intended for development
//! and test environments.

use crate::{
    responses::{ok, ApiResult, AppError},
    state::AppState,
};
use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Serialize};
use shipstream_core::ShipstreamError;
use tracing::warn;
use utoipa::ToSchema;

/// Result of a queue purge.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurgeResponse {
    /// Messages dropped from the queue.
    pub dropped: u64,
}

/// Result of a ledger reset.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    pub reset: bool,
}

/// Creates the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/queue/purge", post(purge_queue))
        .route("/ledger/reset", post(reset_ledger))
}

/// Drop all pending and in-flight dispatch messages.
#[utoipa::path(
    post,
    path = "/admin/queue/purge",
    tag = "admin",
    responses(
        (status = 200, description = "Queue purged", body = PurgeResponse),
        (status = 500, description = "Queue backend unavailable")
    )
)]
pub async fn purge_queue(State(state): State<AppState>) -> ApiResult<PurgeResponse> {
    warn!("Admin queue purge requested");

    let dropped = state
        .queue
        .purge()
        .await
        .map_err(ShipstreamError::from)?;
    ok(PurgeResponse { dropped })
}

/// Drop and recreate the ledger schema.
#[utoipa::path(
    post,
    path = "/admin/ledger/reset",
    tag = "admin",
    responses(
        (status = 200, description = "Ledger reset", body = ResetResponse),
        (status = 500, description = "Reset failed")
    )
)]
pub async fn reset_ledger(State(state): State<AppState>) -> ApiResult<ResetResponse> {
    warn!("Admin ledger reset requested");

    let pool = state.ledger_pool.as_ref().ok_or_else(|| {
        AppError(ShipstreamError::internal(
            "Ledger reset requires a database-backed deployment",
        ))
    })?;

    shipstream_repository::reset_schema(pool).await?;
    ok(ResetResponse { reset: true })
}
