//! Job-related DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shipstream_core::{
    validation::rules, JobId, JobStatus, SearchMode, ShipmentRecord, ShipstreamError,
};
use utoipa::ToSchema;
use validator::Validate;

/// Request to submit a new search job.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobRequest {
    /// Owning tenant, as a UUID string.
    #[validate(custom(function = "rules::valid_tenant_id", message = "Tenant id must be a UUID"))]
    pub tenant_id: String,

    /// Pattern to search for.
    #[validate(custom(function = "rules::valid_pattern", message = "Pattern must be 1-64 characters"))]
    pub pattern: String,

    /// Search mode ("waybill" or "reference"). Defaults to waybill.
    pub mode: Option<String>,
}

impl SubmitJobRequest {
    /// Parses the optional mode field, defaulting to waybill.
    pub fn parse_mode(&self) -> Result<SearchMode, ShipstreamError> {
        match &self.mode {
            None => Ok(SearchMode::default()),
            Some(s) => s
                .parse()
                .map_err(|e: String| ShipstreamError::validation(e)),
        }
    }
}

/// Response to a job submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobResponse {
    pub job_id: JobId,
    pub status: JobStatus,
}

/// A shipment result row, as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentRecordResponse {
    pub reference_no: String,
    pub waybill_no: String,
    pub origin: String,
    pub destination: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<ShipmentRecord> for ShipmentRecordResponse {
    fn from(record: ShipmentRecord) -> Self {
        Self {
            reference_no: record.reference_no,
            waybill_no: record.waybill_no,
            origin: record.origin,
            destination: record.destination,
            status: record.status,
            created_at: record.created_at,
        }
    }
}

/// Poll response: job status plus all results written so far.
///
/// An unknown job id yields a `None` status and no results rather than
/// an error; it is indistinguishable from a job not yet visible.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub job_id: JobId,
    pub status: Option<JobStatus>,
    pub results: Vec<ShipmentRecordResponse>,
}

impl PollResponse {
    /// Returns true when the job reached a terminal status.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status.is_some_and(|s| s.is_terminal())
    }
}

/// Fast status response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub job_id: JobId,
    pub status: Option<JobStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn valid_request() -> SubmitJobRequest {
        SubmitJobRequest {
            tenant_id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            pattern: "1234567890".to_string(),
            mode: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_blank_pattern_is_rejected() {
        let mut request = valid_request();
        request.pattern = "   ".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_overlong_pattern_is_rejected() {
        let mut request = valid_request();
        request.pattern = "9".repeat(65);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_garbage_tenant_id_is_rejected() {
        let mut request = valid_request();
        request.tenant_id = "not-a-uuid".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_mode_defaults_to_waybill() {
        assert_eq!(valid_request().parse_mode().unwrap(), SearchMode::Waybill);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let mut request = valid_request();
        request.mode = Some("carrier".to_string());
        assert!(request.parse_mode().is_err());
    }

    #[test]
    fn test_poll_response_completion() {
        let mut response = PollResponse {
            job_id: JobId::new(),
            status: None,
            results: vec![],
        };
        assert!(!response.is_complete());

        response.status = Some(JobStatus::Dispatched);
        assert!(!response.is_complete());

        response.status = Some(JobStatus::Done);
        assert!(response.is_complete());
    }

    #[test]
    fn test_submit_request_uses_camel_case() {
        let json = "{\"tenantId\":\"550e8400-e29b-41d4-a716-446655440000\",\"pattern\":\"x\"}";
        let request: SubmitJobRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.pattern, "x");
        assert!(request.mode.is_none());
    }
}
