//! # Shipstream Jobs
//!
//! Redis-backed dispatch queue for search jobs.
//!
//! The queue carries self-contained dispatch messages from the ingest
//! endpoint to the fulfillment workers. It is a delivery channel, not a
//! store of record: the job ledger remains the source of truth, and lost
//! messages are recovered by the reconciliation sweep.

mod error;
mod message;
mod queue;
pub mod redis;

pub use error::*;
pub use message::*;
pub use queue::*;
pub use redis::RedisDispatchQueue;
