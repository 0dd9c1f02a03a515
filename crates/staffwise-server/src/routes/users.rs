//! Read-only user listing.
//!
//! Users belong to the identity subsystem; this API never writes them.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::context::AppContext;
use crate::error::AppError;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

/// GET /users/
#[utoipa::path(
    get,
    path = "/users/",
    responses((status = 200, description = "All users ordered by username", body = Vec<UserResponse>))
)]
pub async fn list_users(State(ctx): State<AppContext>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let conn = ctx.conn()?;
    let users = staffwise_db::queries::users::list_users(&conn)?;
    Ok(Json(
        users
            .into_iter()
            .map(|u| UserResponse {
                id: u.id.get(),
                username: u.username,
            })
            .collect(),
    ))
}
