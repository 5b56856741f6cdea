//! `ops` crate — backup, deploy and list of n8n workflows.
//!
//! Every operation is a self-contained request/response cycle against n8n's
//! SQLite database: look up, read or write a row, and mirror it to disk.
//! Records are handled one at a time; nothing is held open between them.

pub mod error;
pub mod config;
pub mod models;
pub mod slug;
pub mod batch;
pub mod backup;
pub mod deploy;
pub mod list;

pub use backup::{backup_matching, backup_workflow, BackupSummary};
pub use batch::{BatchEntry, BatchReport};
pub use config::{SyncConfig, DEFAULT_NAME_PREFIX};
pub use deploy::{deploy, deploy_all, deploy_document, deploy_entry, DeploySummary};
pub use error::SyncError;
pub use list::{list_workflows, ListScope, WorkflowListing};
pub use models::WorkflowDocument;
pub use slug::slugify;

#[cfg(test)]
mod ops_tests;
