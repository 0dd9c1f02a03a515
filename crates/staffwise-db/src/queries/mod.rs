//! Database query modules.

pub mod assignments;
pub mod clients;
pub mod profiles;
pub mod projects;
pub mod users;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use staffwise_core::{Error, Result};

/// Which SQLite constraint rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Constraint {
    Unique,
    ForeignKey,
    Check,
}

/// Classify a rusqlite error as a constraint violation, if it is one.
pub(crate) fn violated_constraint(e: &rusqlite::Error) -> Option<Constraint> {
    match e {
        rusqlite::Error::SqliteFailure(err, msg)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            match err.extended_code {
                rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => Some(Constraint::Unique),
                rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(Constraint::ForeignKey),
                // ON DELETE RESTRICT is enforced as a trigger.
                rusqlite::ffi::SQLITE_CONSTRAINT_TRIGGER
                    if msg.as_deref().is_some_and(|m| m.contains("FOREIGN KEY")) =>
                {
                    Some(Constraint::ForeignKey)
                }
                rusqlite::ffi::SQLITE_CONSTRAINT_CHECK => Some(Constraint::Check),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Open a write transaction that takes the database lock up front, so a
/// foreign-key lookup and the dependent insert see the same snapshot.
pub(crate) fn begin_immediate(conn: &Connection) -> Result<Transaction<'_>> {
    Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(|e| Error::database(e.to_string()))
}

/// Whether a row with `id` exists in `table`.
pub(crate) fn row_exists(conn: &Connection, table: &str, id: i64) -> Result<bool> {
    let q = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)");
    conn.query_row(&q, [id], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))
}
