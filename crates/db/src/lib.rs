//! `db` crate — pure persistence layer over n8n's SQLite database.
//!
//! Provides a connection handle, typed row structs, and repository functions
//! for the `workflow_entity` table.  The table belongs to n8n; this crate only
//! reads it and updates a fixed set of columns.  No business logic lives here.

pub mod error;
pub mod connection;
pub mod repository;
pub mod models;

pub use connection::Database;
pub use error::DbError;
