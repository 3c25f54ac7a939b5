//! Bearer token extraction for the upload route

use std::fmt;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::debug;

use crate::error::ApiError;

/// Access token presented by the caller
///
/// The token is forwarded to the platform untouched and never logged.
#[derive(Clone)]
pub struct BearerToken(pub String);

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Extract the token from an `Authorization` header value
///
/// The value must start with the literal `Bearer ` and the first
/// space-delimited segment after it must be non-empty.
pub fn parse_bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .and_then(|rest| rest.split(' ').next())
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .and_then(parse_bearer)
            .ok_or_else(|| {
                debug!("Rejected request without a usable bearer token");
                ApiError::Unauthorized
            })?;

        Ok(BearerToken(token.to_string()))
    }
}
