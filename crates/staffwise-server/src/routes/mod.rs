//! Route handlers for the HTTP API.

pub mod assignments;
pub mod clients;
pub mod health;
pub mod profiles;
pub mod projects;
pub mod users;

use axum::http::{Method, StatusCode, Uri};
use axum::Json;
use serde::Serialize;
use staffwise_core::Error;

use crate::error::AppError;

/// Body returned by every create endpoint.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CreatedResponse {
    pub id: i64,
    /// `"created"`, or `"assigned"` for assignments.
    pub status: &'static str,
}

impl CreatedResponse {
    pub(crate) fn created(id: impl Into<i64>) -> (StatusCode, Json<Self>) {
        (
            StatusCode::CREATED,
            Json(Self {
                id: id.into(),
                status: "created",
            }),
        )
    }

    pub(crate) fn assigned(id: impl Into<i64>) -> (StatusCode, Json<Self>) {
        (
            StatusCode::CREATED,
            Json(Self {
                id: id.into(),
                status: "assigned",
            }),
        )
    }
}

/// Parse a `{id}` path segment into a typed id.
pub(crate) fn parse_path_id<T: From<i64>>(raw: &str, entity: &str) -> Result<T, AppError> {
    match raw.parse::<i64>() {
        Ok(v) if v > 0 => Ok(T::from(v)),
        _ => Err(Error::Validation(format!("Invalid {entity} id '{raw}'")).into()),
    }
}

/// Answer for a known path requested with an unsupported method.
pub async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    Error::method_not_allowed(method, uri.path()).into()
}

/// Answer for paths that match no route.
pub async fn route_not_found(uri: Uri) -> AppError {
    Error::not_found("route", uri.path()).into()
}
