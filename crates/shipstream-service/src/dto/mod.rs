//! Data transfer objects for the service layer.

mod job_dto;

pub use job_dto::*;
