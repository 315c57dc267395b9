//! Result type aliases for Shipstream.

use crate::ShipstreamError;

/// A specialized `Result` type for Shipstream operations.
pub type ShipstreamResult<T> = Result<T, ShipstreamError>;
