//! staffwise-server: HTTP API over the staffing data model.
//!
//! This crate ties the storage layer to an axum router. It provides:
//!
//! - Create/list/delete handlers for clients, projects, assignments and
//!   professional profiles, plus a read-only user listing
//! - Explicit request validation and JSON error mapping
//! - Request-id tracing middleware and an OpenAPI document
//! - `start`, which serves until Ctrl+C or SIGTERM

pub mod context;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod validation;

use std::net::SocketAddr;

use staffwise_core::config::Config;
use staffwise_core::Error;

use crate::context::AppContext;

/// Serve the API described by `config` until Ctrl+C or SIGTERM.
///
/// The database file (and its directory) is created on first use and
/// migrated before the listener is bound.
pub async fn start(config: Config) -> staffwise_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("{warning}");
    }

    let path = config.database.path.clone();
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)?,
        _ => {}
    }
    let db = staffwise_db::pool::init_pool(&path.to_string_lossy(), config.database.pool_size)?;
    tracing::info!(path = %path.display(), "Database ready");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| Error::Internal(format!("bad listen address: {e}")))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Internal(format!("cannot listen on {addr}: {e}")))?;

    let app = router::build_router(AppContext::new(db, config));
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Stopped");
    Ok(())
}

/// Resolves on the first of Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutting down");
}
