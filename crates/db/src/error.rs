//! Typed error type for the db crate.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The database file could not be opened.
    #[error("failed to connect to n8n database at {}", .path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },

    /// A statement failed (bad SQL, schema mismatch, malformed JSON seen by SQLite, …).
    #[error("database query failed")]
    Query(#[source] sqlx::Error),

    #[error("workflow not found: {0}")]
    NotFound(String),
}

impl DbError {
    /// `true` when the database itself is unreachable, as opposed to a
    /// single statement going wrong.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}
