//! Status cache for the fast status path.

pub mod cache_keys;
mod cache_interface;
mod redis_cache;

pub use cache_interface::*;
pub use redis_cache::*;
