//! OpenAPI documentation configuration.

use crate::controllers::admin_controller::{PurgeResponse, ResetResponse};
use crate::controllers::health_controller::HealthResponse;
use shipstream_core::{ErrorResponse, FieldError, JobId, JobStatus, SearchMode, TenantId};
use shipstream_service::{
    PollResponse, ShipmentRecordResponse, StatusResponse, SubmitJobRequest, SubmitJobResponse,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the Shipstream API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shipstream API",
        version = "1.0.0",
        description = "Asynchronous shipment lookup API"
    ),
    paths(
        crate::controllers::jobs_controller::submit_job,
        crate::controllers::jobs_controller::poll_job,
        crate::controllers::jobs_controller::job_status,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
        crate::controllers::admin_controller::purge_queue,
        crate::controllers::admin_controller::reset_ledger,
    ),
    components(
        schemas(
            JobId,
            TenantId,
            JobStatus,
            SearchMode,
            ErrorResponse,
            FieldError,
            SubmitJobRequest,
            SubmitJobResponse,
            PollResponse,
            StatusResponse,
            ShipmentRecordResponse,
            HealthResponse,
            PurgeResponse,
            ResetResponse,
        )
    ),
    tags(
        (name = "jobs", description = "Job submission and polling"),
        (name = "health", description = "Health check endpoints"),
        (name = "admin", description = "Destructive maintenance operations")
    )
)]
pub struct ApiDoc;
