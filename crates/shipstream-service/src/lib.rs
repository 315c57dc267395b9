//! # Shipstream Service
//!
//! Business logic for the shipment lookup pipeline: job submission,
//! result polling, the fast status path, the reconciliation sweep, and
//! a client-side poller.

pub mod cache;
pub mod dto;
mod r#impl;
mod job_service;
mod polling;
mod reconciler;
#[cfg(test)]
pub(crate) mod testing;

pub use cache::{RedisStatusCache, StatusCache};
pub use dto::*;
pub use job_service::*;
pub use polling::*;
pub use r#impl::*;
pub use reconciler::*;
