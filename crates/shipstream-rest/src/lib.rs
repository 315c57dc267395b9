//! # Shipstream REST
//!
//! Axum HTTP layer: job ingest, polling, fast status, health, and the
//! optional admin surface.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
mod router;
mod state;

pub use router::*;
pub use state::*;
