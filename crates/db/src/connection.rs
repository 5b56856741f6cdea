//! Short-lived SQLite connections to the n8n database.
//!
//! No pool is kept: every repository call opens a connection, runs its
//! statement and closes it again before returning.

use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use tracing::{debug, warn};

use crate::DbError;

/// Location of the n8n database plus the options used to open it.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    options: SqliteConnectOptions,
}

impl Database {
    /// Point at an existing database file.  Nothing is opened until a
    /// repository function needs a connection.
    ///
    /// The file is never created: n8n owns the schema, so a missing file is a
    /// configuration error.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(false);
        Self { path, options }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a fresh connection.
    pub async fn connect(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.path.display(), "opening n8n database connection");
        SqliteConnection::connect_with(&self.options)
            .await
            .map_err(|source| DbError::Connection {
                path: self.path.clone(),
                source,
            })
    }
}

/// Close a connection obtained from [`Database::connect`].
///
/// A failed close is logged rather than returned: by then the statement has
/// already run and its result is what the caller cares about.
pub(crate) async fn release(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        warn!("failed to close n8n database connection: {e}");
    }
}
