//! Professional profile operations.

use rusqlite::Connection;
use staffwise_core::{Error, ProfileId, Result, Seniority, UserId};

use crate::models::{ProfessionalProfile, ProfileWithUser};

use super::{begin_immediate, row_exists, violated_constraint, Constraint};

const COLS: &str = "id, user_id, position, seniority";

/// Create the professional profile of a user.
///
/// Fails with [`Error::NotFound`] for an unknown user and
/// [`Error::Conflict`] if the user already has a profile.
pub fn create_profile(
    conn: &Connection,
    user_id: UserId,
    position: &str,
    seniority: Seniority,
) -> Result<ProfessionalProfile> {
    let tx = begin_immediate(conn)?;

    if !row_exists(&tx, "users", user_id.get())? {
        return Err(Error::not_found("user", user_id));
    }

    tx.execute(
        "INSERT INTO professional_profile (user_id, position, seniority) VALUES (?1, ?2, ?3)",
        rusqlite::params![user_id.get(), position, seniority.code()],
    )
    .map_err(|e| match violated_constraint(&e) {
        Some(Constraint::Unique) => {
            Error::Conflict(format!("user {user_id} already has a professional profile"))
        }
        _ => Error::database(e.to_string()),
    })?;
    let id = ProfileId::from(tx.last_insert_rowid());

    tx.commit().map_err(|e| Error::database(e.to_string()))?;
    tracing::info!(profile_id = %id, user_id = %user_id, "Created professional profile");

    Ok(ProfessionalProfile {
        id,
        user_id,
        position: position.to_string(),
        seniority,
    })
}

/// Get a profile by primary key.
pub fn get_profile(conn: &Connection, id: ProfileId) -> Result<Option<ProfessionalProfile>> {
    let q = format!("SELECT {COLS} FROM professional_profile WHERE id = ?1");
    let result = conn.query_row(&q, [id.get()], ProfessionalProfile::from_row);
    match result {
        Ok(p) => Ok(Some(p)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Get the profile belonging to a user.
pub fn get_profile_for_user(
    conn: &Connection,
    user_id: UserId,
) -> Result<Option<ProfessionalProfile>> {
    let q = format!("SELECT {COLS} FROM professional_profile WHERE user_id = ?1");
    let result = conn.query_row(&q, [user_id.get()], ProfessionalProfile::from_row);
    match result {
        Ok(p) => Ok(Some(p)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List every profile with its owner's username, ordered by username.
pub fn list_profiles(conn: &Connection) -> Result<Vec<ProfileWithUser>> {
    let mut stmt = conn
        .prepare(
            "SELECT p.id, p.user_id, p.position, p.seniority, u.username
             FROM professional_profile p
             JOIN users u ON u.id = p.user_id
             ORDER BY u.username ASC",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], ProfileWithUser::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Delete a profile. Returns true if a row was deleted.
pub fn delete_profile(conn: &Connection, id: ProfileId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM professional_profile WHERE id = ?1", [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}
