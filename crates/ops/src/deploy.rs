//! Push workflow documents from disk back into the n8n database.
//!
//! A deploy overwrites `name`, `nodes`, `connections` and `settings` of one
//! existing row and then reads the row back.  The update and the read are two
//! separate connections; another writer can slip in between, and the last
//! write wins.

use std::io;
use std::path::{Path, PathBuf};

use db::repository::workflows as wf_repo;
use registry::{Registry, RegistryEntry};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::batch::BatchReport;
use crate::{SyncConfig, SyncError, WorkflowDocument};

/// The row as observed right after the update.
#[derive(Debug, Clone, Serialize)]
pub struct DeploySummary {
    pub id: String,
    pub name: String,
    pub node_count: i64,
    pub active: bool,
    pub file: PathBuf,
}

/// Deploy `<workflows-dir>/<file>` onto the row with n8n id `id`.
#[instrument(skip(config))]
pub async fn deploy_document(
    config: &SyncConfig,
    id: &str,
    file: &str,
) -> Result<DeploySummary, SyncError> {
    let path = config.workflows_dir.join(file);
    let document = read_document(&path).await?;
    let columns = document.to_columns()?;

    let db = config.database();
    let affected = wf_repo::update_workflow(&db, id, columns.as_update(&document.name)).await?;
    if affected == 0 {
        return Err(SyncError::RecordNotFound(id.to_string()));
    }

    let status = wf_repo::get_deploy_status(&db, id).await?;
    info!(
        name = %status.name,
        nodes = status.node_count.unwrap_or_default(),
        active = status.active,
        "workflow deployed"
    );

    Ok(DeploySummary {
        id: id.to_string(),
        name: status.name,
        node_count: status.node_count.unwrap_or_default(),
        active: status.active,
        file: path,
    })
}

/// Deploy the document a registry entry points at.
pub async fn deploy_entry(
    config: &SyncConfig,
    entry: &RegistryEntry,
) -> Result<DeploySummary, SyncError> {
    deploy_document(config, entry.id, entry.file).await
}

/// Resolve `target` in the registry and deploy it.
pub async fn deploy(
    config: &SyncConfig,
    registry: &Registry,
    target: &str,
) -> Result<DeploySummary, SyncError> {
    let entry = registry
        .resolve(target)
        .ok_or_else(|| SyncError::UnknownWorkflow {
            key: target.to_string(),
            known: registry.keys().into_iter().map(String::from).collect(),
        })?;
    deploy_entry(config, entry).await
}

/// Deploy every registry entry in declaration order.
///
/// A failing entry is logged and recorded; only an unreachable database
/// aborts the run.
#[instrument(skip_all)]
pub async fn deploy_all(
    config: &SyncConfig,
    registry: &Registry,
) -> Result<BatchReport<DeploySummary>, SyncError> {
    let mut report = BatchReport::default();

    for entry in registry.entries() {
        match deploy_entry(config, entry).await {
            Err(e) if e.is_fatal() => return Err(e),
            result => {
                if let Err(e) = &result {
                    debug!(key = entry.key, id = entry.id, error = %e, "deploy failed");
                }
                report.push(entry.key, result);
            }
        }
    }

    Ok(report)
}

async fn read_document(path: &Path) -> Result<WorkflowDocument, SyncError> {
    let text = tokio::fs::read_to_string(path).await.map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            SyncError::FileNotFound(path.to_path_buf())
        } else {
            SyncError::Io {
                action: "read",
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_str(&text).map_err(|source| SyncError::MalformedDocument {
        path: path.to_path_buf(),
        source,
    })
}
