//! Principal extraction.
//!
//! Authentication happens upstream; by the time a request reaches this
//! service the identity provider has verified the session and placed the
//! user's stable id in a header. Routes that act on behalf of a user take a
//! [`Principal`] argument and are rejected with 401 when the header is
//! missing or unusable.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::Response,
};
use common::ServiceError;

use super::handlers::error_response;
use super::state::AppState;

/// Stable id of the authenticated user making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(pub String);

#[async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let name = state.principal_header_name.as_str();
        let value = parts.headers.get(name).ok_or_else(|| {
            error_response(&ServiceError::Unauthorized(format!("missing {name} header")))
        })?;
        let id = value.to_str().map_err(|_| {
            error_response(&ServiceError::Unauthorized(format!(
                "{name} header contains non-ASCII characters"
            )))
        })?;
        let id = id.trim();
        if id.is_empty() {
            return Err(error_response(&ServiceError::Unauthorized(format!(
                "{name} header is empty"
            ))));
        }
        Ok(Principal(id.to_owned()))
    }
}
