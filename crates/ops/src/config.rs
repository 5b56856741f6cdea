//! Locations used by every operation.

use std::path::PathBuf;

use db::Database;

use crate::SyncError;

/// Name prefix shared by every workflow this project owns.
pub const DEFAULT_NAME_PREFIX: &str = "Catalyst-Automation";

/// Where the n8n database lives and where documents are written.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// n8n's SQLite file (default: `~/.n8n/database.sqlite`).
    pub database_path: PathBuf,
    /// Latest document per workflow, overwritten by every backup.
    pub workflows_dir: PathBuf,
    /// Timestamped archive copies.
    pub backups_dir: PathBuf,
    /// Case-insensitive name prefix selecting "our" workflows.
    pub name_prefix: String,
}

impl SyncConfig {
    /// Defaults for everything except the database location.
    pub fn with_database(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            workflows_dir: PathBuf::from("workflows"),
            backups_dir: PathBuf::from("backups"),
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
        }
    }

    /// Defaults, with the database n8n creates under the user's home directory.
    pub fn from_home() -> Result<Self, SyncError> {
        Ok(Self::with_database(default_database_path()?))
    }

    pub fn database(&self) -> Database {
        Database::new(&self.database_path)
    }
}

/// `$HOME/.n8n/database.sqlite`.
pub fn default_database_path() -> Result<PathBuf, SyncError> {
    let home = dirs::home_dir().ok_or(SyncError::HomeDirUnavailable)?;
    Ok(home.join(".n8n").join("database.sqlite"))
}
