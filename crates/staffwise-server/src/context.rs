//! Application context shared by all route handlers via axum state.

use std::sync::Arc;

use staffwise_core::config::Config;
use staffwise_db::pool::{self, DbPool, PooledConnection};

/// Storage handle and configuration injected into every handler.
///
/// This is cheaply cloneable: the pool is reference counted and the config
/// sits behind an `Arc`.
#[derive(Clone)]
pub struct AppContext {
    /// Database connection pool.
    pub db: DbPool,
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
}

impl AppContext {
    pub fn new(db: DbPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Check out a pooled connection.
    pub fn conn(&self) -> staffwise_core::Result<PooledConnection> {
        pool::get_conn(&self.db)
    }
}
