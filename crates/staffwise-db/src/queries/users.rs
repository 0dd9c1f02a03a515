//! User lookups, plus the create/delete primitives of the identity stand-in.
//!
//! Deleting a user honours the protect rule: while any assignment references
//! the user the delete is rejected and nothing changes. Otherwise the user's
//! professional profile is removed with it (cascade).

use chrono::Utc;
use rusqlite::Connection;
use staffwise_core::{Error, Result, UserId};

use crate::models::User;

use super::{begin_immediate, violated_constraint, Constraint};

const COLS: &str = "id, username, created_at";

/// Create a new user and return it.
pub fn create_user(conn: &Connection, username: &str) -> Result<User> {
    let created_at = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO users (username, created_at) VALUES (?1, ?2)",
        rusqlite::params![username, created_at],
    )
    .map_err(|e| match violated_constraint(&e) {
        Some(Constraint::Unique) => Error::Conflict(format!("Username '{username}' already exists")),
        _ => Error::database(e.to_string()),
    })?;

    Ok(User {
        id: UserId::from(conn.last_insert_rowid()),
        username: username.to_string(),
        created_at,
    })
}

/// Get a user by primary key.
pub fn get_user(conn: &Connection, id: UserId) -> Result<Option<User>> {
    let q = format!("SELECT {COLS} FROM users WHERE id = ?1");
    let result = conn.query_row(&q, [id.get()], User::from_row);
    match result {
        Ok(u) => Ok(Some(u)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Get a user by username.
pub fn get_user_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    let q = format!("SELECT {COLS} FROM users WHERE username = ?1");
    let result = conn.query_row(&q, [username], User::from_row);
    match result {
        Ok(u) => Ok(Some(u)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all users ordered by username.
pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let q = format!("SELECT {COLS} FROM users ORDER BY username ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], User::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Number of assignments that reference a user.
pub fn count_assignments(conn: &Connection, id: UserId) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM assignment WHERE collaborator_id = ?1",
        [id.get()],
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// Delete a user by ID. Returns true if a row was deleted.
///
/// Fails with [`Error::ReferentialIntegrity`] while assignments reference
/// the user; the user and its assignments are left untouched.
pub fn delete_user(conn: &Connection, id: UserId) -> Result<bool> {
    let tx = begin_immediate(conn)?;

    let referencing = count_assignments(&tx, id)?;
    if referencing > 0 {
        return Err(Error::ReferentialIntegrity(format!(
            "user {id} is referenced by {referencing} assignment(s)"
        )));
    }

    let n = tx
        .execute("DELETE FROM users WHERE id = ?1", [id.get()])
        .map_err(|e| match violated_constraint(&e) {
            Some(Constraint::ForeignKey) => {
                Error::ReferentialIntegrity(format!("user {id} is still referenced"))
            }
            _ => Error::database(e.to_string()),
        })?;

    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    if n > 0 {
        tracing::info!(user_id = %id, "Deleted user");
    }
    Ok(n > 0)
}
