//! Embedded SQL migrations and runner.
//!
//! Migrations are stored as `&str` constants and executed in order.  A
//! `schema_migrations` table tracks which versions have been applied.

use rusqlite::Connection;
use staffwise_core::{Error, Result};

/// V1: initial schema -- users, profiles, clients, projects, assignments.
///
/// Deletion policy:
/// - users -> professional_profile: CASCADE
/// - client -> project: CASCADE
/// - project -> assignment: CASCADE
/// - users -> assignment: RESTRICT (a referenced user cannot be deleted)
const V1_INITIAL: &str = r#"
-- Users are owned by the identity subsystem; this schema only references them.
CREATE TABLE users (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    username   TEXT UNIQUE NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE professional_profile (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id   INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    position  TEXT NOT NULL,
    seniority TEXT NOT NULL CHECK (seniority IN ('JR', 'MID', 'SR', 'LEAD'))
);

CREATE TABLE client (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL,
    contact_email TEXT NOT NULL
);

CREATE TABLE project (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    client_id  INTEGER NOT NULL REFERENCES client(id) ON DELETE CASCADE,
    start_date TEXT NOT NULL,
    end_date   TEXT,
    CHECK (end_date IS NULL OR end_date >= start_date)
);

CREATE TABLE assignment (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id      INTEGER NOT NULL REFERENCES project(id) ON DELETE CASCADE,
    collaborator_id INTEGER NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    role            TEXT NOT NULL,
    assigned_hours  INTEGER NOT NULL CHECK (assigned_hours >= 0),
    assigned_at     TEXT NOT NULL,
    UNIQUE (project_id, collaborator_id)
);
"#;

/// V2: foreign-key indexes for the join-heavy listing queries.
const V2_INDEXES: &str = r#"
CREATE INDEX idx_project_client          ON project(client_id);
CREATE INDEX idx_assignment_collaborator ON assignment(collaborator_id);
"#;

/// Ordered list of (version, sql) pairs.
const MIGRATIONS: &[(i64, &str)] = &[(1, V1_INITIAL), (2, V2_INDEXES)];

/// Highest migration version known to this build.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map(|&(v, _)| v).unwrap_or(0)
}

/// Run all pending migrations on `conn`.
///
/// Creates the `schema_migrations` tracking table if it does not exist,
/// then applies each outstanding migration inside a transaction.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(|e| Error::database(format!("Failed to create schema_migrations: {e}")))?;

    for &(version, sql) in MIGRATIONS {
        let already: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1",
                [version],
                |row| row.get(0),
            )
            .map_err(|e| Error::database(e.to_string()))?;

        if already {
            continue;
        }

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        tx.execute_batch(sql)
            .map_err(|e| Error::database(format!("Migration V{version} failed: {e}")))?;

        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            [version],
        )
        .map_err(|e| Error::database(e.to_string()))?;

        tx.commit().map_err(|e| Error::database(e.to_string()))?;

        tracing::debug!("Applied migration V{version}");
    }

    Ok(())
}

/// Versions recorded in `schema_migrations`, ascending.
pub fn applied_versions(conn: &Connection) -> Result<Vec<i64>> {
    let mut stmt = conn
        .prepare("SELECT version FROM schema_migrations ORDER BY version")
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<i64>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}
