//! Client CRUD operations.

use rusqlite::Connection;
use staffwise_core::{ClientId, Error, Result};

use crate::models::Client;

const COLS: &str = "id, name, contact_email";

/// Create a new client.
pub fn create_client(conn: &Connection, name: &str, contact_email: &str) -> Result<Client> {
    conn.execute(
        "INSERT INTO client (name, contact_email) VALUES (?1, ?2)",
        rusqlite::params![name, contact_email],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    let id = ClientId::from(conn.last_insert_rowid());
    tracing::info!(client_id = %id, "Created client");

    Ok(Client {
        id,
        name: name.to_string(),
        contact_email: contact_email.to_string(),
    })
}

/// Get a client by ID.
pub fn get_client(conn: &Connection, id: ClientId) -> Result<Option<Client>> {
    let q = format!("SELECT {COLS} FROM client WHERE id = ?1");
    let result = conn.query_row(&q, [id.get()], Client::from_row);
    match result {
        Ok(c) => Ok(Some(c)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all clients in creation order.
pub fn list_clients(conn: &Connection) -> Result<Vec<Client>> {
    let q = format!("SELECT {COLS} FROM client ORDER BY id");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Client::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Delete a client (cascades to its projects and their assignments).
pub fn delete_client(conn: &Connection, id: ClientId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM client WHERE id = ?1", [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;
    if n > 0 {
        tracing::info!(client_id = %id, "Deleted client");
    }
    Ok(n > 0)
}
