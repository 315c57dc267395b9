//! Request extractors.

mod tenant;

pub use tenant::*;
