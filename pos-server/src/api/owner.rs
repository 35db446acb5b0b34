//! Tenant extraction
//!
//! Every owner-scoped route pulls the tenant id from the `x-owner-id`
//! header. A missing or empty header is a 401; handlers never see
//! unscoped requests.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::utils::AppError;

pub const OWNER_HEADER: &str = "x-owner-id";

/// Tenant id for the current request
#[derive(Debug, Clone)]
pub struct OwnerId(pub String);

impl<S> FromRequestParts<S> for OwnerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| OwnerId(s.to_string()))
            .ok_or(AppError::Unauthorized)
    }
}
