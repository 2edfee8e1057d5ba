//! Request extractors with JSON error bodies

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::ServerError;

/// [`Json`] extractor whose rejections are reported as a [`ServerError`], so
/// malformed bodies get the same `{ "error": ... }` shape as every other
/// failure.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ServerError::Rejected(
                rejection.status(),
                rejection.body_text(),
            )),
        }
    }
}
