//! Errors produced by the backup, deploy and list operations.

use std::io;
use std::path::PathBuf;

use db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    // ------ Storage ------

    /// Connection or statement failure from the db crate.
    #[error(transparent)]
    Database(DbError),

    /// No row with this id exists in `workflow_entity`.
    #[error("workflow not found: {0}")]
    NotFound(String),

    /// A JSON column could not be parsed into the expected shape.
    #[error("workflow {id} has malformed {column} column: {reason}")]
    MalformedStoredData {
        id: String,
        column: &'static str,
        reason: String,
    },

    /// The update matched zero rows: the id is registered but n8n does not
    /// have it.
    #[error("workflow ID not found in database: {0}")]
    RecordNotFound(String),

    // ------ Registry ------

    #[error("unknown workflow \"{key}\" (available workflows: {})", .known.join(", "))]
    UnknownWorkflow { key: String, known: Vec<String> },

    // ------ Files ------

    #[error("workflow file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("invalid workflow document {}", .path.display())]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to {action} {}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize workflow document")]
    Serialize(#[from] serde_json::Error),

    // ------ Configuration ------

    #[error("cannot determine the home directory; pass the n8n database path explicitly")]
    HomeDirUnavailable,
}

impl SyncError {
    /// Errors that make every further record pointless: the database cannot
    /// be reached at all.  Batch runs stop on these instead of skipping.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Database(e) if e.is_connection())
    }
}

impl From<DbError> for SyncError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(id) => Self::NotFound(id),
            other => Self::Database(other),
        }
    }
}
