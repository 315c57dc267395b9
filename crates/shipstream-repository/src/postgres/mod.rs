//! PostgreSQL ledger implementations.

mod job_ledger;

pub use job_ledger::*;
