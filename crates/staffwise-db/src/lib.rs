//! staffwise-db: database access and persistence layer.
//!
//! This crate provides SQLite-backed storage with connection pooling,
//! embedded migrations, typed models, and one query module per staffing
//! entity. Referential-integrity rules live both in the schema (foreign-key
//! actions, unique and check constraints) and in the query functions, which
//! translate constraint failures into [`staffwise_core::Error`] variants.
//!
//! # Example
//!
//! ```no_run
//! use staffwise_db::pool::{get_conn, init_pool};
//! use staffwise_db::queries::clients;
//!
//! let pool = init_pool("./staffwise.db", 4).unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let client = clients::create_client(&conn, "Acme", "ops@acme.test").unwrap();
//! println!("Created client {}", client.id);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
