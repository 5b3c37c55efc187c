//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use campus_core::AdminClaims;

/// Authenticated admin extractor.
#[derive(Debug, Clone)]
pub struct AuthAdmin(pub AdminClaims);

impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Claims are set by the auth middleware
        parts
            .extensions
            .get::<AdminClaims>()
            .cloned()
            .map(AuthAdmin)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}
