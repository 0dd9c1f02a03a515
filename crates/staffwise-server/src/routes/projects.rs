//! Project route handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use staffwise_core::{ClientId, Error, ProjectId};
use staffwise_db::models::{ProjectDetail, ProjectSummary};

use crate::context::AppContext;
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::routes::{parse_path_id, CreatedResponse};
use crate::validation::FieldErrors;

/// Request body for creating a project.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateProjectRequest {
    pub client_id: Option<i64>,
    pub name: Option<String>,
    /// `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`, may be omitted or null.
    pub end_date: Option<String>,
}

#[derive(Debug)]
struct NewProject {
    client_id: ClientId,
    name: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
}

impl CreateProjectRequest {
    fn validate(self) -> staffwise_core::Result<NewProject> {
        let mut errors = FieldErrors::new();
        let client_id = errors.required_id("client_id", self.client_id);
        let name = errors.required_text("name", self.name);
        let start_date = errors.required_date("start_date", self.start_date);
        let end_date = errors.optional_date("end_date", self.end_date);
        if let Some(end) = end_date {
            errors.check(end >= start_date, "end_date must not be before start_date");
        }
        errors.finish()?;
        Ok(NewProject {
            client_id,
            name,
            start_date,
            end_date,
        })
    }
}

/// Query parameters for listing projects.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectListQuery {
    /// Only list projects of this client.
    pub client_id: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CollaboratorEntry {
    pub username: String,
    pub role: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProjectSummaryResponse {
    pub id: i64,
    pub name: String,
    /// Name of the owning client.
    pub client: String,
    pub collaborators: Vec<CollaboratorEntry>,
}

impl From<ProjectSummary> for ProjectSummaryResponse {
    fn from(s: ProjectSummary) -> Self {
        Self {
            id: s.id.get(),
            name: s.name,
            client: s.client,
            collaborators: s
                .collaborators
                .into_iter()
                .map(|c| CollaboratorEntry {
                    username: c.username,
                    role: c.role,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProjectClientEntry {
    pub id: i64,
    pub name: String,
    pub contact_email: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProjectMemberEntry {
    pub user_id: i64,
    pub username: String,
    pub role: String,
    pub assigned_hours: u32,
    pub assigned_at: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProjectDetailResponse {
    pub id: i64,
    pub name: String,
    pub client: ProjectClientEntry,
    pub start_date: String,
    pub end_date: Option<String>,
    pub collaborators: Vec<ProjectMemberEntry>,
}

impl From<ProjectDetail> for ProjectDetailResponse {
    fn from(d: ProjectDetail) -> Self {
        Self {
            id: d.project.id.get(),
            name: d.project.name,
            client: ProjectClientEntry {
                id: d.client.id.get(),
                name: d.client.name,
                contact_email: d.client.contact_email,
            },
            start_date: d.project.start_date.to_string(),
            end_date: d.project.end_date.map(|d| d.to_string()),
            collaborators: d
                .members
                .into_iter()
                .map(|m| ProjectMemberEntry {
                    user_id: m.user_id.get(),
                    username: m.username,
                    role: m.role,
                    assigned_hours: m.assigned_hours,
                    assigned_at: m.assigned_at.to_string(),
                })
                .collect(),
        }
    }
}

/// POST /projects/create/
#[utoipa::path(
    post,
    path = "/projects/create/",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = CreatedResponse),
        (status = 400, description = "Missing fields, bad dates or malformed JSON"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn create_project(
    State(ctx): State<AppContext>,
    ApiJson(payload): ApiJson<CreateProjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new = payload.validate()?;

    let conn = ctx.conn()?;
    let project = staffwise_db::queries::projects::create_project(
        &conn,
        new.client_id,
        &new.name,
        new.start_date,
        new.end_date,
    )?;

    Ok(CreatedResponse::created(project.id))
}

/// GET /projects/
#[utoipa::path(
    get,
    path = "/projects/",
    params(ProjectListQuery),
    responses(
        (status = 200, description = "Projects with client name and collaborators", body = Vec<ProjectSummaryResponse>),
        (status = 400, description = "Invalid client_id filter")
    )
)]
pub async fn list_projects(
    State(ctx): State<AppContext>,
    Query(query): Query<ProjectListQuery>,
) -> Result<Json<Vec<ProjectSummaryResponse>>, AppError> {
    let client_id: Option<ClientId> = match query.client_id.as_deref() {
        Some(raw) => Some(parse_path_id(raw, "client")?),
        None => None,
    };

    let conn = ctx.conn()?;
    let summaries = staffwise_db::queries::projects::list_projects(&conn, client_id)?;

    Ok(Json(summaries.into_iter().map(Into::into).collect()))
}

/// GET /projects/{id}/
#[utoipa::path(
    get,
    path = "/projects/{id}/",
    params(("id" = i64, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project detail", body = ProjectDetailResponse),
        (status = 404, description = "Project not found")
    )
)]
pub async fn get_project(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<ProjectDetailResponse>, AppError> {
    let project_id: ProjectId = parse_path_id(&id, "project")?;

    let conn = ctx.conn()?;
    let detail = staffwise_db::queries::projects::get_project_detail(&conn, project_id)?
        .ok_or_else(|| Error::not_found("project", project_id))?;

    Ok(Json(detail.into()))
}

/// DELETE /projects/{id}/
#[utoipa::path(
    delete,
    path = "/projects/{id}/",
    params(("id" = i64, Path, description = "Project ID")),
    responses(
        (status = 204, description = "Project and its assignments deleted"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn delete_project(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let project_id: ProjectId = parse_path_id(&id, "project")?;

    let conn = ctx.conn()?;
    if !staffwise_db::queries::projects::delete_project(&conn, project_id)? {
        return Err(Error::not_found("project", project_id).into());
    }

    Ok(StatusCode::NO_CONTENT)
}
