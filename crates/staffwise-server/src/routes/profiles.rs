//! Professional profile route handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use staffwise_core::{Seniority, UserId};
use staffwise_db::models::ProfileWithUser;

use crate::context::AppContext;
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::routes::CreatedResponse;
use crate::validation::FieldErrors;

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateProfileRequest {
    pub user_id: Option<i64>,
    pub position: Option<String>,
    /// One of `JR`, `MID`, `SR`, `LEAD` (labels are accepted too).
    pub seniority: Option<String>,
}

#[derive(Debug)]
struct NewProfile {
    user_id: UserId,
    position: String,
    seniority: Seniority,
}

impl CreateProfileRequest {
    fn validate(self) -> staffwise_core::Result<NewProfile> {
        let mut errors = FieldErrors::new();
        let user_id = errors.required_id("user_id", self.user_id);
        let position = errors.required_text("position", self.position);
        let seniority = errors.required_seniority("seniority", self.seniority);
        errors.finish()?;
        Ok(NewProfile {
            user_id,
            position,
            seniority,
        })
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub position: String,
    pub seniority: Seniority,
}

impl From<ProfileWithUser> for ProfileResponse {
    fn from(p: ProfileWithUser) -> Self {
        Self {
            id: p.profile.id.get(),
            user_id: p.profile.user_id.get(),
            username: p.username,
            position: p.profile.position,
            seniority: p.profile.seniority,
        }
    }
}

/// POST /profiles/create/
#[utoipa::path(
    post,
    path = "/profiles/create/",
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = CreatedResponse),
        (status = 400, description = "Missing fields or unknown seniority"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User already has a profile")
    )
)]
pub async fn create_profile(
    State(ctx): State<AppContext>,
    ApiJson(payload): ApiJson<CreateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new = payload.validate()?;

    let conn = ctx.conn()?;
    let profile = staffwise_db::queries::profiles::create_profile(
        &conn,
        new.user_id,
        &new.position,
        new.seniority,
    )?;

    Ok(CreatedResponse::created(profile.id))
}

/// GET /profiles/
#[utoipa::path(
    get,
    path = "/profiles/",
    responses((status = 200, description = "All profiles", body = Vec<ProfileResponse>))
)]
pub async fn list_profiles(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<ProfileResponse>>, AppError> {
    let conn = ctx.conn()?;
    let profiles = staffwise_db::queries::profiles::list_profiles(&conn)?;
    Ok(Json(profiles.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seniority_label_is_accepted() {
        let new = CreateProfileRequest {
            user_id: Some(3),
            position: Some("Backend Developer".into()),
            seniority: Some("senior".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(new.seniority, Seniority::Senior);
    }

    #[test]
    fn unknown_seniority_is_rejected() {
        let err = CreateProfileRequest {
            user_id: Some(3),
            position: Some("Backend Developer".into()),
            seniority: Some("Principal".into()),
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("seniority must be one of"));
    }
}
