//! Axum router construction.
//!
//! Builds the application router with all route groups, the OpenAPI
//! document, JSON fallbacks for unknown routes and wrong methods, and the
//! middleware stack.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health,
        routes::clients::create_client,
        routes::clients::list_clients,
        routes::clients::get_client,
        routes::clients::delete_client,
        routes::projects::create_project,
        routes::projects::list_projects,
        routes::projects::get_project,
        routes::projects::delete_project,
        routes::assignments::create_assignment,
        routes::assignments::list_assignments,
        routes::assignments::delete_assignment,
        routes::profiles::create_profile,
        routes::profiles::list_profiles,
        routes::users::list_users,
    ),
    components(schemas(
        routes::CreatedResponse,
        routes::health::HealthResponse,
        routes::clients::CreateClientRequest,
        routes::clients::ClientResponse,
        routes::clients::ClientDetailResponse,
        routes::clients::ClientProjectEntry,
        routes::projects::CreateProjectRequest,
        routes::projects::ProjectSummaryResponse,
        routes::projects::CollaboratorEntry,
        routes::projects::ProjectDetailResponse,
        routes::projects::ProjectClientEntry,
        routes::projects::ProjectMemberEntry,
        routes::assignments::CreateAssignmentRequest,
        routes::assignments::AssignmentResponse,
        routes::profiles::CreateProfileRequest,
        routes::profiles::ProfileResponse,
        routes::users::UserResponse,
        staffwise_core::Seniority,
    ))
)]
struct ApiDoc;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let clients = Router::new()
        .route("/clients/", get(routes::clients::list_clients))
        .route("/clients/create/", post(routes::clients::create_client))
        .route(
            "/clients/{id}/",
            get(routes::clients::get_client).delete(routes::clients::delete_client),
        );

    let projects = Router::new()
        .route("/projects/", get(routes::projects::list_projects))
        .route("/projects/create/", post(routes::projects::create_project))
        .route(
            "/projects/{id}/",
            get(routes::projects::get_project).delete(routes::projects::delete_project),
        );

    let assignments = Router::new()
        .route("/assignments/", get(routes::assignments::list_assignments))
        .route(
            "/assignments/create/",
            post(routes::assignments::create_assignment),
        )
        .route(
            "/assignments/{id}/",
            axum::routing::delete(routes::assignments::delete_assignment),
        );

    let people = Router::new()
        .route("/profiles/", get(routes::profiles::list_profiles))
        .route("/profiles/create/", post(routes::profiles::create_profile))
        .route("/users/", get(routes::users::list_users));

    // Fallbacks are registered after every route so the 405 handler reaches
    // all method routers.
    Router::new()
        .route("/health", get(routes::health::health))
        .merge(clients)
        .merge(projects)
        .merge(assignments)
        .merge(people)
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .method_not_allowed_fallback(routes::method_not_allowed)
        .fallback(routes::route_not_found)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use staffwise_core::config::Config;
    use tower::ServiceExt;

    fn app() -> Router {
        let db = staffwise_db::pool::init_memory_pool().unwrap();
        build_router(AppContext::new(db, Config::default()))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn write_endpoints_reject_get() {
        for uri in ["/clients/create/", "/projects/create/", "/assignments/create/"] {
            let response = app()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{uri}");
            let body = json_body(response).await;
            assert_eq!(body["code"], "method_not_allowed");
            assert!(body["request_id"].is_string());
        }
    }

    #[tokio::test]
    async fn project_list_rejects_post() {
        let response = app().oneshot(post_json("/projects/", "{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let response = app()
            .oneshot(Request::get("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["code"], "not_found");
    }

    #[tokio::test]
    async fn create_client_returns_created() {
        let response = app()
            .oneshot(post_json(
                "/clients/create/",
                r#"{"name": "Acme", "contact_email": "ops@acme.test"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["status"], "created");
        assert!(body["id"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let response = app()
            .oneshot(post_json("/clients/create/", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "validation_error");
    }

    #[tokio::test]
    async fn invalid_path_id_is_400() {
        let response = app()
            .oneshot(Request::get("/projects/abc/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn request_id_header_is_echoed() {
        let response = app()
            .oneshot(
                Request::get("/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }
}
