use axum::extract::FromRequestParts;
use axum::http::{HeaderName, request::Parts};

use crate::domain::value_objects::OwnerId;
use crate::presentation::http::errors::AppError;

/// Name of the header the fronting auth layer sets to the caller's user id.
/// Installed as a request extension by the server.
#[derive(Debug, Clone)]
pub struct OwnerHeader(pub HeaderName);

impl Default for OwnerHeader {
    fn default() -> Self {
        Self(HeaderName::from_static("x-user-id"))
    }
}

/// The authenticated caller. Rejects with `401` when the header is absent or
/// does not hold a positive integer id.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedOwner(pub OwnerId);

impl<S> FromRequestParts<S> for AuthenticatedOwner
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .extensions
            .get::<OwnerHeader>()
            .cloned()
            .unwrap_or_default();

        parts
            .headers
            .get(&header.0)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<OwnerId>().ok())
            .map(AuthenticatedOwner)
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))
    }
}
