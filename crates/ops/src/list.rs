//! Read-only overview of the workflows stored in n8n.

use std::fmt;

use chrono::NaiveDateTime;
use db::models::WorkflowSummaryRow;
use db::repository::workflows as wf_repo;
use tracing::instrument;

use crate::{SyncConfig, SyncError};

/// Which rows the listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListScope {
    /// Every workflow in the database.
    All,
    /// Only names starting with the configured prefix.
    #[default]
    Matching,
}

/// Summary rows, most recently updated first.
#[derive(Debug, Clone)]
pub struct WorkflowListing {
    pub rows: Vec<WorkflowSummaryRow>,
}

impl WorkflowListing {
    pub fn total(&self) -> usize {
        self.rows.len()
    }

    pub fn active(&self) -> usize {
        self.rows.iter().filter(|r| r.active).count()
    }

    pub fn inactive(&self) -> usize {
        self.total() - self.active()
    }
}

#[instrument(skip(config))]
pub async fn list_workflows(config: &SyncConfig, scope: ListScope) -> Result<WorkflowListing, SyncError> {
    let prefix = match scope {
        ListScope::All => None,
        ListScope::Matching => Some(config.name_prefix.as_str()),
    };
    let rows = wf_repo::list_workflows(&config.database(), prefix).await?;
    Ok(WorkflowListing { rows })
}

impl fmt::Display for WorkflowListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return writeln!(f, "⚠️  No workflows found");
        }

        for (i, row) in self.rows.iter().enumerate() {
            let status = if row.active { "🟢" } else { "⚪" };
            let nodes = row.node_count.unwrap_or_default();
            let nodes_icon = if nodes > 0 { "📊" } else { "📄" };

            writeln!(f, "{}. {status} {}", i + 1, row.name)?;
            writeln!(f, "   ID: {}", row.id)?;
            writeln!(f, "   {nodes_icon} Nodes: {nodes}")?;
            writeln!(f, "   Created: {}", format_timestamp(row.created_at.as_deref()))?;
            writeln!(f, "   Updated: {}", format_timestamp(row.updated_at.as_deref()))?;
            writeln!(f)?;
        }

        writeln!(f, "Total: {} workflow(s)", self.total())?;
        writeln!(f, "Active: {}", self.active())?;
        writeln!(f, "Inactive: {}", self.inactive())
    }
}

/// n8n stores `YYYY-MM-DD HH:MM:SS.SSS` in UTC; show it without the
/// milliseconds.  Anything else is printed as stored.
fn format_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "-".to_string();
    };
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
