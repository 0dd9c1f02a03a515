//! Assignment route handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use staffwise_core::{AssignmentId, Error, ProjectId, UserId};
use staffwise_db::models::AssignmentListing;

use crate::context::AppContext;
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::routes::{parse_path_id, CreatedResponse};
use crate::validation::FieldErrors;

/// Request body for assigning a collaborator to a project.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateAssignmentRequest {
    pub project_id: Option<i64>,
    pub user_id: Option<i64>,
    pub role: Option<String>,
    pub assigned_hours: Option<i64>,
}

#[derive(Debug)]
struct NewAssignment {
    project_id: ProjectId,
    user_id: UserId,
    role: String,
    assigned_hours: u32,
}

impl CreateAssignmentRequest {
    fn validate(self) -> staffwise_core::Result<NewAssignment> {
        let mut errors = FieldErrors::new();
        let project_id = errors.required_id("project_id", self.project_id);
        let user_id = errors.required_id("user_id", self.user_id);
        let role = errors.required_text("role", self.role);
        let assigned_hours = errors.required_hours("assigned_hours", self.assigned_hours);
        errors.finish()?;
        Ok(NewAssignment {
            project_id,
            user_id,
            role,
            assigned_hours,
        })
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AssignmentResponse {
    pub id: i64,
    pub project_id: i64,
    /// Project name.
    pub project: String,
    pub user_id: i64,
    /// Collaborator username.
    pub collaborator: String,
    pub role: String,
    pub assigned_hours: u32,
    pub assigned_at: String,
}

impl From<AssignmentListing> for AssignmentResponse {
    fn from(l: AssignmentListing) -> Self {
        Self {
            id: l.assignment.id.get(),
            project_id: l.assignment.project_id.get(),
            project: l.project_name,
            user_id: l.assignment.collaborator_id.get(),
            collaborator: l.username,
            role: l.assignment.role,
            assigned_hours: l.assignment.assigned_hours,
            assigned_at: l.assignment.assigned_at.to_string(),
        }
    }
}

/// POST /assignments/create/
#[utoipa::path(
    post,
    path = "/assignments/create/",
    request_body = CreateAssignmentRequest,
    responses(
        (status = 201, description = "Collaborator assigned", body = CreatedResponse),
        (status = 400, description = "Missing fields, negative hours or malformed JSON"),
        (status = 404, description = "Project or user not found"),
        (status = 409, description = "Collaborator already assigned to the project")
    )
)]
pub async fn create_assignment(
    State(ctx): State<AppContext>,
    ApiJson(payload): ApiJson<CreateAssignmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new = payload.validate()?;

    let conn = ctx.conn()?;
    let assignment = staffwise_db::queries::assignments::create_assignment(
        &conn,
        new.project_id,
        new.user_id,
        &new.role,
        new.assigned_hours,
    )?;

    Ok(CreatedResponse::assigned(assignment.id))
}

/// GET /assignments/
#[utoipa::path(
    get,
    path = "/assignments/",
    responses((status = 200, description = "All assignments", body = Vec<AssignmentResponse>))
)]
pub async fn list_assignments(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let conn = ctx.conn()?;
    let listings = staffwise_db::queries::assignments::list_assignments(&conn)?;
    Ok(Json(listings.into_iter().map(Into::into).collect()))
}

/// DELETE /assignments/{id}/
#[utoipa::path(
    delete,
    path = "/assignments/{id}/",
    params(("id" = i64, Path, description = "Assignment ID")),
    responses(
        (status = 204, description = "Assignment deleted"),
        (status = 404, description = "Assignment not found")
    )
)]
pub async fn delete_assignment(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let assignment_id: AssignmentId = parse_path_id(&id, "assignment")?;

    let conn = ctx.conn()?;
    if !staffwise_db::queries::assignments::delete_assignment(&conn, assignment_id)? {
        return Err(Error::not_found("assignment", assignment_id).into());
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_hours_is_valid() {
        let new = CreateAssignmentRequest {
            project_id: Some(1),
            user_id: Some(2),
            role: Some("Dev".into()),
            assigned_hours: Some(0),
        }
        .validate()
        .unwrap();
        assert_eq!(new.assigned_hours, 0);
        assert_eq!(new.user_id, UserId::from(2));
    }

    #[test]
    fn negative_hours_and_missing_role_are_reported_together() {
        let err = CreateAssignmentRequest {
            project_id: Some(1),
            user_id: Some(2),
            role: None,
            assigned_hours: Some(-5),
        }
        .validate()
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("role is required"));
        assert!(message.contains("assigned_hours must be a non-negative integer"));
    }
}
