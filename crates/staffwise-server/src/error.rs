//! JSON error responses.
//!
//! Implements `IntoResponse` for [`staffwise_core::Error`] so that route
//! handlers can return `Result<T, AppError>` and use `?` on storage calls.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::middleware::request_id;

/// A [`staffwise_core::Error`] tagged with the id of the request it failed.
#[derive(Debug)]
pub struct AppError {
    inner: staffwise_core::Error,
    request_id: Option<String>,
}

impl AppError {
    pub fn new(inner: staffwise_core::Error) -> Self {
        Self {
            inner,
            request_id: request_id::current(),
        }
    }

    pub fn inner(&self) -> &staffwise_core::Error {
        &self.inner
    }
}

impl From<staffwise_core::Error> for AppError {
    fn from(e: staffwise_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Request failed"
            );
        } else {
            tracing::debug!(status = %status, error = %self.inner, "Request rejected");
        }

        let body = json!({
            "error": self.inner.to_string(),
            "code": self.inner.code(),
            "request_id": self.request_id,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staffwise_core::Error;

    #[test]
    fn not_found_produces_404() {
        let response = AppError::new(Error::not_found("client", 3)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_produces_400() {
        let response = AppError::new(Error::Validation("name is required".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflict_and_referential_integrity_produce_409() {
        let response = AppError::new(Error::Conflict("dup".into())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response =
            AppError::new(Error::ReferentialIntegrity("in use".into())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn method_not_allowed_produces_405() {
        let response =
            AppError::new(Error::method_not_allowed("GET", "/clients/create/")).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn request_id_outside_request_scope_is_none() {
        let err = AppError::new(Error::Internal("oops".into()));
        assert!(err.request_id.is_none());
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
