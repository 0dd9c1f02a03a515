//! Custom axum extractors.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON body extractor whose rejections are reported as validation errors.
///
/// axum's own `Json` answers 415/422 for a missing content type or a body of
/// the wrong shape; the API reports every unreadable body as 400.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            staffwise_core::Error::Validation(format!("invalid JSON body: {}", rejection.body_text()))
        })?;
        Ok(Self(value))
    }
}
