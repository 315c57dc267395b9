//! Job ingest and polling controller.

use crate::{
    extractors::CallerTenant,
    responses::{ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use shipstream_core::{JobId, ShipstreamError};
use shipstream_service::{PollResponse, StatusResponse, SubmitJobRequest, SubmitJobResponse};
use tracing::debug;

/// Creates the jobs router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_job))
        .route("/:id", get(poll_job))
        .route("/:id/status", get(job_status))
}

/// Submit a new search job.
///
/// Success means the job is durably recorded and queued, not finished;
/// the caller polls for completion.
#[utoipa::path(
    post,
    path = "/api/jobs",
    tag = "jobs",
    request_body = SubmitJobRequest,
    responses(
        (status = 200, description = "Job accepted", body = SubmitJobResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Duplicate job id"),
        (status = 500, description = "Ledger write failed")
    )
)]
pub async fn submit_job(
    State(state): State<AppState>,
    Json(request): Json<SubmitJobRequest>,
) -> ApiResult<SubmitJobResponse> {
    debug!("Submit job request for tenant: {}", request.tenant_id);

    let response = state.job_service.submit(request).await?;
    ok(response)
}

/// Poll a job for status and results.
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    tag = "jobs",
    params(
        ("id" = String, Path, description = "Job id"),
        ("x-tenant-id" = String, Header, description = "Caller tenant id")
    ),
    responses(
        (status = 200, description = "Job status and results", body = PollResponse),
        (status = 400, description = "Invalid job or tenant id"),
        (status = 403, description = "Job belongs to a different tenant")
    )
)]
pub async fn poll_job(
    State(state): State<AppState>,
    CallerTenant(tenant): CallerTenant,
    Path(id): Path<String>,
) -> ApiResult<PollResponse> {
    debug!("Poll job request: {}", id);

    let job_id = parse_job_id(&id)?;
    let response = state.job_service.poll(job_id, tenant).await?;
    ok(response)
}

/// Fast status lookup, served from the status cache when possible.
#[utoipa::path(
    get,
    path = "/api/jobs/{id}/status",
    tag = "jobs",
    params(
        ("id" = String, Path, description = "Job id")
    ),
    responses(
        (status = 200, description = "Job status", body = StatusResponse),
        (status = 400, description = "Invalid job id")
    )
)]
pub async fn job_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusResponse> {
    debug!("Job status request: {}", id);

    let job_id = parse_job_id(&id)?;
    let response = state.job_service.status(job_id).await?;
    ok(response)
}

/// Helper to parse a job id from a path parameter.
fn parse_job_id(id: &str) -> Result<JobId, AppError> {
    JobId::parse(id)
        .map_err(|_| AppError(ShipstreamError::validation(format!("Invalid job id: {}", id))))
}
