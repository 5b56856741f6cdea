//! Row structs that map onto n8n's `workflow_entity` table.
//!
//! These are *persistence* models — they carry no domain behaviour.
//! JSON columns are kept as raw text; parsing them is the caller's job so a
//! malformed column can be reported instead of silently dropped.
//! Domain types live in the `ops` crate.

use serde::Serialize;
use sqlx::FromRow;

/// The columns backup needs from a single workflow row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkflowEntityRow {
    pub id: String,
    pub name: String,
    pub active: bool,
    /// JSON array of node definitions.
    pub nodes: Option<String>,
    /// JSON object describing edges between nodes.
    pub connections: Option<String>,
    /// JSON object; n8n leaves it NULL or empty on older rows.
    pub settings: Option<String>,
}

/// Identifier and display name, as returned by prefix searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct WorkflowRef {
    pub id: String,
    pub name: String,
}

/// Post-deploy verification read.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DeployStatusRow {
    pub name: String,
    pub active: bool,
    /// `json_array_length(nodes)`, computed by SQLite.
    pub node_count: Option<i64>,
}

/// Summary columns rendered by the list report.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkflowSummaryRow {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub node_count: Option<i64>,
}

/// New column values written by a deploy.  The JSON columns are already
/// serialized; `updatedAt` is refreshed by the statement itself.
#[derive(Debug, Clone, Copy)]
pub struct WorkflowUpdate<'a> {
    pub name: &'a str,
    pub nodes: &'a str,
    pub connections: &'a str,
    pub settings: &'a str,
}
