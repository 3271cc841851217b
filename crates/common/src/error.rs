//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::Unauthorized`] → 401
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::NotImplemented`] → 501
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed — missing field, blank value, or invalid JSON.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The upstream identity provider did not supply a usable principal.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The addressed resource does not exist for this principal.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation is part of the API surface but has no implementation.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::Unauthorized(_) => 401,
            ServiceError::NotFound(_) => 404,
            ServiceError::NotImplemented(_) => 501,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code placed in the error response body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::Unauthorized(_) => "unauthorized",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::NotImplemented(_) => "not_implemented",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}
