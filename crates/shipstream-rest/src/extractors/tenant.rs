//! Caller tenant extraction.

use crate::responses::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use shipstream_core::{ShipstreamError, TenantId};

/// Header carrying the caller's tenant id.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// The tenant making the request, taken from the `X-Tenant-Id` header.
///
/// Tenant identity is asserted by the caller; ownership is enforced
/// against the ledger on every read.
#[derive(Debug, Clone, Copy)]
pub struct CallerTenant(pub TenantId);

#[async_trait]
impl<S> FromRequestParts<S> for CallerTenant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(TENANT_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError(ShipstreamError::validation("Missing X-Tenant-Id header"))
            })?;

        let tenant = TenantId::parse(raw).map_err(|_| {
            AppError(ShipstreamError::validation(format!(
                "Invalid tenant id: {}",
                raw
            )))
        })?;

        Ok(Self(tenant))
    }
}
