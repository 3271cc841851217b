//! Extractors whose rejections use the service's JSON error body.
//!
//! axum's stock `Json` and `Path` rejections answer with plain text. These
//! wrappers run the stock extractor and turn any rejection into
//! [`ServiceError::BadRequest`].

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    response::Response,
    Json,
};
use common::ServiceError;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::handlers::error_response;

/// JSON request body.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(error_response(&ServiceError::BadRequest(
                rejection.body_text(),
            ))),
        }
    }
}

/// The `:id` path segment of an `/accounts/:id/..` route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AccountId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<Uuid>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(Self(id)),
            Err(rejection) => Err(error_response(&ServiceError::BadRequest(format!(
                "invalid account id: {}",
                rejection.body_text()
            )))),
        }
    }
}
