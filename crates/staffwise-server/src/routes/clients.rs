//! Client route handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use staffwise_core::{ClientId, Error};

use crate::context::AppContext;
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::routes::{parse_path_id, CreatedResponse};
use crate::validation::FieldErrors;

/// Request body for creating a client.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateClientRequest {
    pub name: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Debug)]
struct NewClient {
    name: String,
    contact_email: String,
}

impl CreateClientRequest {
    fn validate(self) -> staffwise_core::Result<NewClient> {
        let mut errors = FieldErrors::new();
        let name = errors.required_text("name", self.name);
        let contact_email = errors.required_text("contact_email", self.contact_email);
        errors.finish()?;
        Ok(NewClient {
            name,
            contact_email,
        })
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ClientResponse {
    pub id: i64,
    pub name: String,
    pub contact_email: String,
}

impl ClientResponse {
    fn from_model(client: staffwise_db::models::Client) -> Self {
        Self {
            id: client.id.get(),
            name: client.name,
            contact_email: client.contact_email,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ClientProjectEntry {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ClientDetailResponse {
    #[serde(flatten)]
    pub client: ClientResponse,
    pub projects: Vec<ClientProjectEntry>,
}

/// POST /clients/create/
#[utoipa::path(
    post,
    path = "/clients/create/",
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Client created", body = CreatedResponse),
        (status = 400, description = "Missing fields or malformed JSON")
    )
)]
pub async fn create_client(
    State(ctx): State<AppContext>,
    ApiJson(payload): ApiJson<CreateClientRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new = payload.validate()?;

    let conn = ctx.conn()?;
    let client =
        staffwise_db::queries::clients::create_client(&conn, &new.name, &new.contact_email)?;

    Ok(CreatedResponse::created(client.id))
}

/// GET /clients/
#[utoipa::path(
    get,
    path = "/clients/",
    responses((status = 200, description = "All clients", body = Vec<ClientResponse>))
)]
pub async fn list_clients(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<ClientResponse>>, AppError> {
    let conn = ctx.conn()?;
    let clients = staffwise_db::queries::clients::list_clients(&conn)?;
    Ok(Json(clients.into_iter().map(ClientResponse::from_model).collect()))
}

/// GET /clients/{id}/
#[utoipa::path(
    get,
    path = "/clients/{id}/",
    params(("id" = i64, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client with its projects", body = ClientDetailResponse),
        (status = 404, description = "Client not found")
    )
)]
pub async fn get_client(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<ClientDetailResponse>, AppError> {
    let client_id: ClientId = parse_path_id(&id, "client")?;

    let conn = ctx.conn()?;
    let client = staffwise_db::queries::clients::get_client(&conn, client_id)?
        .ok_or_else(|| Error::not_found("client", client_id))?;
    let projects = staffwise_db::queries::projects::list_client_projects(&conn, client_id)?;

    Ok(Json(ClientDetailResponse {
        client: ClientResponse::from_model(client),
        projects: projects
            .into_iter()
            .map(|p| ClientProjectEntry {
                id: p.id.get(),
                name: p.name,
            })
            .collect(),
    }))
}

/// DELETE /clients/{id}/
#[utoipa::path(
    delete,
    path = "/clients/{id}/",
    params(("id" = i64, Path, description = "Client ID")),
    responses(
        (status = 204, description = "Client, its projects and their assignments deleted"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn delete_client(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let client_id: ClientId = parse_path_id(&id, "client")?;

    let conn = ctx.conn()?;
    if !staffwise_db::queries::clients::delete_client(&conn, client_id)? {
        return Err(Error::not_found("client", client_id).into());
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_requires_both_fields() {
        let err = CreateClientRequest::default().validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: name is required; contact_email is required"
        );
    }

    #[test]
    fn validate_trims() {
        let new = CreateClientRequest {
            name: Some("  Acme ".into()),
            contact_email: Some("ops@acme.test".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(new.name, "Acme");
    }
}
