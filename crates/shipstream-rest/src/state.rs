//! Application state for Axum handlers.

use shipstream_jobs::DispatchQueue;
use shipstream_repository::LedgerPool;
use shipstream_service::JobService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub job_service: Arc<dyn JobService>,
    pub queue: Arc<dyn DispatchQueue>,
    /// Present when the server owns a real ledger pool; readiness and the
    /// admin reset degrade gracefully without one.
    pub ledger_pool: Option<Arc<LedgerPool>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        job_service: Arc<dyn JobService>,
        queue: Arc<dyn DispatchQueue>,
        ledger_pool: Option<Arc<LedgerPool>>,
    ) -> Self {
        Self {
            job_service,
            queue,
            ledger_pool,
        }
    }
}
