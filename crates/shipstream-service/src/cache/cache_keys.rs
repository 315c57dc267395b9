//! Cache key builders.

use shipstream_core::JobId;

/// Key for a job's cached status.
#[must_use]
pub fn job_status(id: JobId) -> String {
    format!("job:{}", id)
}
