//! Export workflows from the n8n database to JSON documents.
//!
//! Each backup writes the same pretty-printed document twice:
//! `<workflows-dir>/<slug>.json` (latest, overwritten) and
//! `<backups-dir>/<slug>_<timestamp>.json` (archive).

use std::path::{Path, PathBuf};

use chrono::Utc;
use db::repository::workflows as wf_repo;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::batch::BatchReport;
use crate::slug::{archive_timestamp, slugify};
use crate::{SyncConfig, SyncError, WorkflowDocument};

/// What a successful backup wrote.
#[derive(Debug, Clone, Serialize)]
pub struct BackupSummary {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub node_count: usize,
    pub workflow_path: PathBuf,
    pub backup_path: PathBuf,
}

/// Back up a single workflow by its n8n id.
#[instrument(skip(config))]
pub async fn backup_workflow(config: &SyncConfig, id: &str) -> Result<BackupSummary, SyncError> {
    let row = wf_repo::get_workflow(&config.database(), id).await?;
    let document = WorkflowDocument::from_row(&row)?;
    let contents = document.to_pretty_json()?;

    let mut slug = slugify(&row.name);
    if slug.is_empty() {
        warn!(name = %row.name, "workflow name has no usable characters, naming files after its id");
        slug = row.id.clone();
    }
    let timestamp = archive_timestamp(Utc::now());

    let workflow_path = config.workflows_dir.join(format!("{slug}.json"));
    let backup_path = config.backups_dir.join(format!("{slug}_{timestamp}.json"));

    write_document(&workflow_path, &contents).await?;
    write_document(&backup_path, &contents).await?;

    info!(
        name = %row.name,
        nodes = document.node_count(),
        path = %workflow_path.display(),
        "workflow backed up"
    );

    Ok(BackupSummary {
        id: row.id,
        name: row.name,
        active: row.active,
        node_count: document.node_count(),
        workflow_path,
        backup_path,
    })
}

/// Back up every workflow whose name starts with `config.name_prefix`.
///
/// Records are processed one at a time.  A failing record is logged and
/// recorded in the report; only an unreachable database aborts the run.
/// Zero matches yields an empty report.
#[instrument(skip(config), fields(prefix = %config.name_prefix))]
pub async fn backup_matching(config: &SyncConfig) -> Result<BatchReport<BackupSummary>, SyncError> {
    let targets = wf_repo::find_workflows_by_prefix(&config.database(), &config.name_prefix).await?;

    let mut report = BatchReport::default();
    if targets.is_empty() {
        warn!("no {} workflows found", config.name_prefix);
        return Ok(report);
    }

    info!("backing up {} workflow(s)", targets.len());
    for target in targets {
        match backup_workflow(config, &target.id).await {
            Err(e) if e.is_fatal() => return Err(e),
            result => {
                if let Err(e) = &result {
                    debug!(name = %target.name, id = %target.id, error = %e, "backup failed");
                }
                report.push(target.name, result);
            }
        }
    }

    Ok(report)
}

async fn write_document(path: &Path, contents: &str) -> Result<(), SyncError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| SyncError::Io {
                action: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| SyncError::Io {
            action: "write",
            path: path.to_path_buf(),
            source,
        })
}
