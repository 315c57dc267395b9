//! # Shipstream Core
//!
//! Core types, traits, and error definitions for Shipstream.
//! This crate provides the foundational abstractions used across all layers
//! of the job submission and fulfillment pipeline.

pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use validation::*;
