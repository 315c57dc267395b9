//! Service implementations.

mod job_service_impl;

pub use job_service_impl::*;
