//! Rust structs mapping to database tables.
//!
//! Each table model implements `from_row` for constructing itself from a
//! `rusqlite::Row`. Read models for the joined listings are assembled by the
//! query modules.

use std::fmt;

use chrono::NaiveDate;
use staffwise_core::{AssignmentId, ClientId, ProfileId, ProjectId, Seniority, UserId};

/// Storage format for every date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

fn conversion_failure<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}

/// Read an integer row id into a typed ID.
pub(crate) fn parse_id<T: From<i64>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    let raw: i64 = row.get(idx)?;
    Ok(T::from(raw))
}

/// Parse a `YYYY-MM-DD` text column.
pub(crate) fn parse_date(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(idx)?;
    NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(|e| conversion_failure(idx, e))
}

pub(crate) fn parse_opt_date(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let s: Option<String> = row.get(idx)?;
    match s {
        Some(v) => NaiveDate::parse_from_str(&v, DATE_FORMAT)
            .map(Some)
            .map_err(|e| conversion_failure(idx, e)),
        None => Ok(None),
    }
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_seniority(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Seniority> {
    let code: String = row.get(idx)?;
    code.parse().map_err(|e| conversion_failure(idx, e))
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A user as seen from this core (read-only outside of the identity stand-in).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub created_at: String,
}

impl User {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            username: row.get(1)?,
            created_at: row.get(2)?,
        })
    }
}

// ---------------------------------------------------------------------------
// ProfessionalProfile
// ---------------------------------------------------------------------------

/// One-to-one professional extension of a [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfessionalProfile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub position: String,
    pub seniority: Seniority,
}

impl ProfessionalProfile {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            user_id: parse_id(row, 1)?,
            position: row.get(2)?,
            seniority: parse_seniority(row, 3)?,
        })
    }
}

/// A profile joined with its owner's username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileWithUser {
    pub profile: ProfessionalProfile,
    pub username: String,
}

impl ProfileWithUser {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            profile: ProfessionalProfile::from_row(row)?,
            username: row.get(4)?,
        })
    }
}

impl fmt::Display for ProfileWithUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.username, self.profile.position)
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub contact_email: String,
}

impl Client {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            name: row.get(1)?,
            contact_email: row.get(2)?,
        })
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub client_id: ClientId,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl Project {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            name: row.get(1)?,
            client_id: parse_id(row, 2)?,
            start_date: parse_date(row, 3)?,
            end_date: parse_opt_date(row, 4)?,
        })
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Collaborator entry of a project listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorRole {
    pub username: String,
    pub role: String,
}

/// A project with its client's name and the roles of its collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: String,
    pub client: String,
    pub collaborators: Vec<CollaboratorRole>,
}

/// One assignment of a project, resolved to its collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMember {
    pub assignment_id: AssignmentId,
    pub user_id: UserId,
    pub username: String,
    pub role: String,
    pub assigned_hours: u32,
    pub assigned_at: NaiveDate,
}

/// A project fetched together with its client and collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetail {
    pub project: Project,
    pub client: Client,
    pub members: Vec<ProjectMember>,
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// Associative entity between [`Project`] and [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: AssignmentId,
    pub project_id: ProjectId,
    pub collaborator_id: UserId,
    pub role: String,
    pub assigned_hours: u32,
    pub assigned_at: NaiveDate,
}

impl Assignment {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            project_id: parse_id(row, 1)?,
            collaborator_id: parse_id(row, 2)?,
            role: row.get(3)?,
            assigned_hours: row.get(4)?,
            assigned_at: parse_date(row, 5)?,
        })
    }
}

/// An assignment joined with its project name and collaborator username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentListing {
    pub assignment: Assignment,
    pub project_name: String,
    pub username: String,
}

impl AssignmentListing {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            assignment: Assignment::from_row(row)?,
            project_name: row.get(6)?,
            username: row.get(7)?,
        })
    }
}

impl fmt::Display for AssignmentListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.project_name, self.username)
    }
}
