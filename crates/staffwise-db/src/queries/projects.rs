//! Project operations, including the joined listing and detail reads.
//!
//! [`list_projects`] resolves every project's client name and the
//! collaborator/role pairs in a single `LEFT JOIN` and folds the rows in one
//! pass, so the cost does not grow with one lookup per collaborator.

use chrono::NaiveDate;
use rusqlite::Connection;
use staffwise_core::{ClientId, Error, ProjectId, Result};

use crate::models::{
    format_date, parse_date, parse_id, CollaboratorRole, Project, ProjectDetail, ProjectMember,
    ProjectSummary,
};

use super::{begin_immediate, clients, row_exists, violated_constraint, Constraint};

const COLS: &str = "id, name, client_id, start_date, end_date";

/// Create a project owned by `client_id`.
///
/// The client lookup and the insert share one immediate transaction, so a
/// concurrent client delete cannot leave a dangling project.
pub fn create_project(
    conn: &Connection,
    client_id: ClientId,
    name: &str,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<Project> {
    let tx = begin_immediate(conn)?;

    if !row_exists(&tx, "client", client_id.get())? {
        return Err(Error::not_found("client", client_id));
    }

    tx.execute(
        "INSERT INTO project (name, client_id, start_date, end_date) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            name,
            client_id.get(),
            format_date(start_date),
            end_date.map(format_date),
        ],
    )
    .map_err(|e| match violated_constraint(&e) {
        Some(Constraint::Check) => {
            Error::Validation("end_date must not be before start_date".into())
        }
        Some(Constraint::ForeignKey) => Error::not_found("client", client_id),
        _ => Error::database(e.to_string()),
    })?;
    let id = ProjectId::from(tx.last_insert_rowid());

    tx.commit().map_err(|e| Error::database(e.to_string()))?;
    tracing::info!(project_id = %id, client_id = %client_id, "Created project");

    Ok(Project {
        id,
        name: name.to_string(),
        client_id,
        start_date,
        end_date,
    })
}

/// Get a project by ID.
pub fn get_project(conn: &Connection, id: ProjectId) -> Result<Option<Project>> {
    let q = format!("SELECT {COLS} FROM project WHERE id = ?1");
    let result = conn.query_row(&q, [id.get()], Project::from_row);
    match result {
        Ok(p) => Ok(Some(p)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Projects owned by a client, in creation order.
pub fn list_client_projects(conn: &Connection, client_id: ClientId) -> Result<Vec<Project>> {
    let q = format!("SELECT {COLS} FROM project WHERE client_id = ?1 ORDER BY id");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([client_id.get()], Project::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// One row of the listing join; collaborator columns are NULL for projects
/// without assignments.
struct SummaryRow {
    id: ProjectId,
    name: String,
    client: String,
    collaborator: Option<CollaboratorRole>,
}

impl SummaryRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        let username: Option<String> = row.get(3)?;
        let role: Option<String> = row.get(4)?;
        Ok(Self {
            id: parse_id(row, 0)?,
            name: row.get(1)?,
            client: row.get(2)?,
            collaborator: username
                .zip(role)
                .map(|(username, role)| CollaboratorRole { username, role }),
        })
    }
}

/// List projects with their client name and collaborator roles.
///
/// Projects are ordered by id, collaborators by assignment id. With
/// `client_id` set only that client's projects are returned.
pub fn list_projects(conn: &Connection, client_id: Option<ClientId>) -> Result<Vec<ProjectSummary>> {
    let mut stmt = conn
        .prepare(
            "SELECT p.id, p.name, c.name, u.username, a.role
             FROM project p
             JOIN client c ON c.id = p.client_id
             LEFT JOIN assignment a ON a.project_id = p.id
             LEFT JOIN users u ON u.id = a.collaborator_id
             WHERE ?1 IS NULL OR p.client_id = ?1
             ORDER BY p.id, a.id",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let rows = stmt
        .query_map([client_id.map(|id| id.get())], SummaryRow::from_row)
        .map_err(|e| Error::database(e.to_string()))?;

    let mut summaries: Vec<ProjectSummary> = Vec::new();
    for row in rows {
        let row = row.map_err(|e| Error::database(e.to_string()))?;
        let same_project = summaries.last().is_some_and(|s| s.id == row.id);
        if !same_project {
            summaries.push(ProjectSummary {
                id: row.id,
                name: row.name,
                client: row.client,
                collaborators: Vec::new(),
            });
        }
        if let (Some(collaborator), Some(summary)) = (row.collaborator, summaries.last_mut()) {
            summary.collaborators.push(collaborator);
        }
    }

    Ok(summaries)
}

/// Fetch a project together with its client and collaborators.
pub fn get_project_detail(conn: &Connection, id: ProjectId) -> Result<Option<ProjectDetail>> {
    let Some(project) = get_project(conn, id)? else {
        return Ok(None);
    };
    let client = clients::get_client(conn, project.client_id)?
        .ok_or_else(|| Error::Internal(format!("project {id} has no client")))?;

    let mut stmt = conn
        .prepare(
            "SELECT a.id, a.collaborator_id, u.username, a.role, a.assigned_hours, a.assigned_at
             FROM assignment a
             JOIN users u ON u.id = a.collaborator_id
             WHERE a.project_id = ?1
             ORDER BY a.id",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let members = stmt
        .query_map([id.get()], |row| {
            Ok(ProjectMember {
                assignment_id: parse_id(row, 0)?,
                user_id: parse_id(row, 1)?,
                username: row.get(2)?,
                role: row.get(3)?,
                assigned_hours: row.get(4)?,
                assigned_at: parse_date(row, 5)?,
            })
        })
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(Some(ProjectDetail {
        project,
        client,
        members,
    }))
}

/// Delete a project (cascades to its assignments).
pub fn delete_project(conn: &Connection, id: ProjectId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM project WHERE id = ?1", [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;
    if n > 0 {
        tracing::info!(project_id = %id, "Deleted project");
    }
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use crate::queries::{assignments, users};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn create_and_get() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let c = clients::create_client(&conn, "Acme", "ops@acme.test").unwrap();

        let p = create_project(&conn, c.id, "Portal", date(2024, 1, 1), Some(date(2024, 6, 30)))
            .unwrap();
        let found = get_project(&conn, p.id).unwrap().unwrap();
        assert_eq!(found, p);
        assert_eq!(found.end_date, Some(date(2024, 6, 30)));
    }

    #[test]
    fn end_date_is_optional() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let c = clients::create_client(&conn, "Acme", "ops@acme.test").unwrap();
        let p = create_project(&conn, c.id, "Open-ended", date(2024, 1, 1), None).unwrap();
        assert_eq!(get_project(&conn, p.id).unwrap().unwrap().end_date, None);
    }

    #[test]
    fn unknown_client() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let err = create_project(&conn, ClientId::from(99), "Ghost", date(2024, 1, 1), None)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { ref entity, .. } if entity == "client"));
    }

    #[test]
    fn end_before_start_rejected() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let c = clients::create_client(&conn, "Acme", "ops@acme.test").unwrap();
        let err = create_project(&conn, c.id, "Backwards", date(2024, 5, 1), Some(date(2024, 4, 1)))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn listing_nests_collaborators() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let c1 = clients::create_client(&conn, "Acme", "ops@acme.test").unwrap();
        let c2 = clients::create_client(&conn, "Globex", "hi@globex.test").unwrap();
        let ana = users::create_user(&conn, "ana").unwrap();
        let ben = users::create_user(&conn, "ben").unwrap();

        let p1 = create_project(&conn, c1.id, "Portal", date(2024, 1, 1), None).unwrap();
        let p2 = create_project(&conn, c2.id, "Billing", date(2024, 2, 1), None).unwrap();
        assignments::create_assignment(&conn, p1.id, ana.id, "Dev", 20).unwrap();
        assignments::create_assignment(&conn, p1.id, ben.id, "QA", 10).unwrap();

        let list = list_projects(&conn, None).unwrap();
        assert_eq!(list.len(), 2);

        assert_eq!(list[0].id, p1.id);
        assert_eq!(list[0].client, "Acme");
        assert_eq!(
            list[0].collaborators,
            vec![
                CollaboratorRole { username: "ana".into(), role: "Dev".into() },
                CollaboratorRole { username: "ben".into(), role: "QA".into() },
            ]
        );

        assert_eq!(list[1].id, p2.id);
        assert_eq!(list[1].client, "Globex");
        assert!(list[1].collaborators.is_empty());
    }

    #[test]
    fn listing_filters_by_client() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let c1 = clients::create_client(&conn, "Acme", "ops@acme.test").unwrap();
        let c2 = clients::create_client(&conn, "Globex", "hi@globex.test").unwrap();
        create_project(&conn, c1.id, "Portal", date(2024, 1, 1), None).unwrap();
        create_project(&conn, c2.id, "Billing", date(2024, 1, 1), None).unwrap();

        let list = list_projects(&conn, Some(c2.id)).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Billing");

        assert_eq!(list_client_projects(&conn, c1.id).unwrap().len(), 1);
    }

    #[test]
    fn detail_includes_client_and_members() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let c = clients::create_client(&conn, "Acme", "ops@acme.test").unwrap();
        let ana = users::create_user(&conn, "ana").unwrap();
        let p = create_project(&conn, c.id, "Portal", date(2024, 1, 1), None).unwrap();
        let a = assignments::create_assignment(&conn, p.id, ana.id, "Dev", 32).unwrap();

        let detail = get_project_detail(&conn, p.id).unwrap().unwrap();
        assert_eq!(detail.client.name, "Acme");
        assert_eq!(detail.members.len(), 1);
        assert_eq!(detail.members[0].assignment_id, a.id);
        assert_eq!(detail.members[0].username, "ana");
        assert_eq!(detail.members[0].assigned_hours, 32);

        assert!(get_project_detail(&conn, ProjectId::from(404)).unwrap().is_none());
    }

    #[test]
    fn delete_cascades_to_assignments() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let c = clients::create_client(&conn, "Acme", "ops@acme.test").unwrap();
        let ana = users::create_user(&conn, "ana").unwrap();
        let p = create_project(&conn, c.id, "Portal", date(2024, 1, 1), None).unwrap();
        let a = assignments::create_assignment(&conn, p.id, ana.id, "Dev", 8).unwrap();

        assert!(delete_project(&conn, p.id).unwrap());
        assert!(assignments::get_assignment(&conn, a.id).unwrap().is_none());
        assert!(clients::get_client(&conn, c.id).unwrap().is_some());

        // with the assignment gone the user is deletable again
        assert!(users::delete_user(&conn, ana.id).unwrap());
    }
}
