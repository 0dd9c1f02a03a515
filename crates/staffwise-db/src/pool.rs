//! SQLite connection pools.
//!
//! Every connection the pool opens enforces foreign keys, so the cascade and
//! restrict actions declared in the schema always apply. Opening a pool also
//! brings the schema up to date.

use std::sync::atomic::{AtomicU64, Ordering};

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use staffwise_core::{Error, Result};

use crate::migrations;

/// Shared pool of SQLite connections.
pub type DbPool = Pool<SqliteConnectionManager>;

/// A connection checked out of a [`DbPool`].
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const FILE_PRAGMAS: &str = "PRAGMA foreign_keys = ON;
     PRAGMA journal_mode = WAL;
     PRAGMA busy_timeout = 5000;";

const MEMORY_POOL_SIZE: u32 = 4;

/// Open a pool over the database file at `db_path` (created if missing).
///
/// Connections run in WAL mode and wait up to five seconds on a locked
/// database instead of failing immediately.
pub fn init_pool(db_path: &str, max_size: u32) -> Result<DbPool> {
    let manager =
        SqliteConnectionManager::file(db_path).with_init(|c| c.execute_batch(FILE_PRAGMAS));
    let pool = build(manager, max_size)?;
    tracing::debug!(path = db_path, max_size, "Opened database pool");
    Ok(pool)
}

/// Open a pool over a private in-memory database.
///
/// The database is named uniquely per call and opened in shared-cache mode:
/// connections of one pool see the same data, separate pools never do.
pub fn init_memory_pool() -> Result<DbPool> {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let uri = format!(
        "file:staffwise_mem_{}?mode=memory&cache=shared",
        NEXT.fetch_add(1, Ordering::Relaxed)
    );

    let manager = SqliteConnectionManager::file(uri)
        .with_init(|c| c.execute_batch("PRAGMA foreign_keys = ON;"));
    build(manager, MEMORY_POOL_SIZE)
}

fn build(manager: SqliteConnectionManager, max_size: u32) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| Error::database(format!("cannot open database pool: {e}")))?;

    let conn = get_conn(&pool)?;
    migrations::run_migrations(&conn)?;
    Ok(pool)
}

/// Check out a connection.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("no database connection available: {e}")))
}
