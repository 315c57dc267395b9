//! # Shipstream Repository
//!
//! Durable job ledger backed by PostgreSQL via SQLx.
//! The ledger is the source of truth for jobs and their shipment results;
//! the dispatch queue and status cache are derived views.

mod admin;
mod pool;
mod postgres;
mod traits;

pub use admin::*;
pub use pool::*;
pub use postgres::*;
pub use traits::*;
