//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, default config,
//! and full [`AppContext`]. The [`TestHarness::with_server`] constructor
//! starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;

use chrono::NaiveDate;
use serde_json::Value;
use staffwise_core::config::Config;
use staffwise_core::{ClientId, ProjectId, UserId};
use staffwise_db::pool::{init_memory_pool, DbPool};
use staffwise_server::context::AppContext;
use staffwise_server::router::build_router;

/// Test harness wrapping an [`AppContext`] backed by an in-memory database.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub client: reqwest::Client,
}

impl TestHarness {
    pub fn new() -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let ctx = AppContext::new(db.clone(), Config::default());
        Self {
            ctx,
            db,
            client: reqwest::Client::new(),
        }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let app = build_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> staffwise_db::pool::PooledConnection {
        staffwise_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }

    /// Insert a user directly (users are never created over HTTP).
    pub fn create_user(&self, username: &str) -> UserId {
        staffwise_db::queries::users::create_user(&self.conn(), username)
            .expect("failed to create user")
            .id
    }

    pub fn create_client(&self, name: &str) -> ClientId {
        let email = format!("{}@example.test", name.to_lowercase());
        staffwise_db::queries::clients::create_client(&self.conn(), name, &email)
            .expect("failed to create client")
            .id
    }

    pub fn create_project(&self, client_id: ClientId, name: &str) -> ProjectId {
        let start = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");
        staffwise_db::queries::projects::create_project(&self.conn(), client_id, name, start, None)
            .expect("failed to create project")
            .id
    }

    pub fn assign(&self, project_id: ProjectId, user_id: UserId, role: &str) {
        staffwise_db::queries::assignments::create_assignment(
            &self.conn(),
            project_id,
            user_id,
            role,
            20,
        )
        .expect("failed to create assignment");
    }

    /// Count rows of `table`.
    pub fn count(&self, table: &str) -> i64 {
        self.conn()
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("count query failed")
    }

    pub async fn post_json(&self, addr: SocketAddr, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(format!("http://{addr}{path}"))
            .json(&body)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn get(&self, addr: SocketAddr, path: &str) -> reqwest::Response {
        self.client
            .get(format!("http://{addr}{path}"))
            .send()
            .await
            .expect("request failed")
    }

    pub async fn delete(&self, addr: SocketAddr, path: &str) -> reqwest::Response {
        self.client
            .delete(format!("http://{addr}{path}"))
            .send()
            .await
            .expect("request failed")
    }
}
