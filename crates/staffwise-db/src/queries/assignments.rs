//! Assignment operations (the project ↔ collaborator associative entity).

use chrono::Utc;
use rusqlite::Connection;
use staffwise_core::{AssignmentId, Error, ProjectId, Result, UserId};

use crate::models::{format_date, Assignment, AssignmentListing};

use super::{begin_immediate, row_exists, violated_constraint, Constraint};

const COLS: &str = "id, project_id, collaborator_id, role, assigned_hours, assigned_at";

/// Assign a collaborator to a project.
///
/// `assigned_at` is stamped with the current UTC date and never changes
/// afterwards. Fails with [`Error::NotFound`] for an unknown project or user
/// and with [`Error::Conflict`] if the pair is already assigned.
pub fn create_assignment(
    conn: &Connection,
    project_id: ProjectId,
    user_id: UserId,
    role: &str,
    assigned_hours: u32,
) -> Result<Assignment> {
    let assigned_at = Utc::now().date_naive();
    let tx = begin_immediate(conn)?;

    if !row_exists(&tx, "project", project_id.get())? {
        return Err(Error::not_found("project", project_id));
    }
    if !row_exists(&tx, "users", user_id.get())? {
        return Err(Error::not_found("user", user_id));
    }

    tx.execute(
        "INSERT INTO assignment (project_id, collaborator_id, role, assigned_hours, assigned_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            project_id.get(),
            user_id.get(),
            role,
            assigned_hours,
            format_date(assigned_at),
        ],
    )
    .map_err(|e| match violated_constraint(&e) {
        Some(Constraint::Unique) => Error::Conflict(format!(
            "user {user_id} is already assigned to project {project_id}"
        )),
        Some(Constraint::Check) => {
            Error::Validation("assigned_hours must be a non-negative integer".into())
        }
        _ => Error::database(e.to_string()),
    })?;
    let id = AssignmentId::from(tx.last_insert_rowid());

    tx.commit().map_err(|e| Error::database(e.to_string()))?;
    tracing::info!(
        assignment_id = %id,
        project_id = %project_id,
        user_id = %user_id,
        "Assigned collaborator"
    );

    Ok(Assignment {
        id,
        project_id,
        collaborator_id: user_id,
        role: role.to_string(),
        assigned_hours,
        assigned_at,
    })
}

/// Get an assignment by ID.
pub fn get_assignment(conn: &Connection, id: AssignmentId) -> Result<Option<Assignment>> {
    let q = format!("SELECT {COLS} FROM assignment WHERE id = ?1");
    let result = conn.query_row(&q, [id.get()], Assignment::from_row);
    match result {
        Ok(a) => Ok(Some(a)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List every assignment with project name and collaborator username.
pub fn list_assignments(conn: &Connection) -> Result<Vec<AssignmentListing>> {
    let mut stmt = conn
        .prepare(
            "SELECT a.id, a.project_id, a.collaborator_id, a.role, a.assigned_hours,
                    a.assigned_at, p.name, u.username
             FROM assignment a
             JOIN project p ON p.id = a.project_id
             JOIN users u ON u.id = a.collaborator_id
             ORDER BY a.id",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], AssignmentListing::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Delete an assignment. Returns true if a row was deleted.
pub fn delete_assignment(conn: &Connection, id: AssignmentId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM assignment WHERE id = ?1", [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;
    if n > 0 {
        tracing::info!(assignment_id = %id, "Deleted assignment");
    }
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use crate::queries::{clients, projects, users};
    use chrono::NaiveDate;

    fn setup() -> (crate::pool::PooledConnection, ProjectId, UserId) {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let c = clients::create_client(&conn, "Acme", "ops@acme.test").unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let p = projects::create_project(&conn, c.id, "Portal", start, None).unwrap();
        let u = users::create_user(&conn, "ana").unwrap();
        (conn, p.id, u.id)
    }

    #[test]
    fn create_and_get() {
        let (conn, pid, uid) = setup();
        let a = create_assignment(&conn, pid, uid, "Dev", 40).unwrap();
        assert_eq!(a.assigned_at, Utc::now().date_naive());

        let found = get_assignment(&conn, a.id).unwrap().unwrap();
        assert_eq!(found, a);
    }

    #[test]
    fn zero_hours_allowed() {
        let (conn, pid, uid) = setup();
        let a = create_assignment(&conn, pid, uid, "Advisor", 0).unwrap();
        assert_eq!(a.assigned_hours, 0);
    }

    #[test]
    fn duplicate_pair_conflicts() {
        let (conn, pid, uid) = setup();
        create_assignment(&conn, pid, uid, "Dev", 40).unwrap();
        let err = create_assignment(&conn, pid, uid, "QA", 5).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(list_assignments(&conn).unwrap().len(), 1);
    }

    #[test]
    fn unknown_project_or_user() {
        let (conn, pid, uid) = setup();

        let err = create_assignment(&conn, ProjectId::from(99), uid, "Dev", 1).unwrap_err();
        assert!(matches!(err, Error::NotFound { ref entity, .. } if entity == "project"));

        let err = create_assignment(&conn, pid, UserId::from(99), "Dev", 1).unwrap_err();
        assert!(matches!(err, Error::NotFound { ref entity, .. } if entity == "user"));
    }

    #[test]
    fn listing_and_delete() {
        let (conn, pid, uid) = setup();
        let a = create_assignment(&conn, pid, uid, "Dev", 12).unwrap();

        let list = list_assignments(&conn).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].to_string(), "Portal - ana");

        assert!(delete_assignment(&conn, a.id).unwrap());
        assert!(get_assignment(&conn, a.id).unwrap().is_none());
        assert!(!delete_assignment(&conn, a.id).unwrap());
    }
}
