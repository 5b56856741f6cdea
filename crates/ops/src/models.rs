//! The on-disk workflow document and its mapping to database columns.

use db::models::{WorkflowEntityRow, WorkflowUpdate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::SyncError;

/// Projection of a `workflow_entity` row written to `<workflows-dir>/<slug>.json`.
///
/// Omits the id, the active flag and timestamps: those belong to n8n.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    pub name: String,
    pub nodes: Vec<Value>,
    pub connections: Map<String, Value>,
    #[serde(default = "default_settings", deserialize_with = "settings_or_default")]
    pub settings: Map<String, Value>,
}

/// Column text for an update, serialized compactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredColumns {
    pub nodes: String,
    pub connections: String,
    pub settings: String,
}

impl StoredColumns {
    pub fn as_update<'a>(&'a self, name: &'a str) -> WorkflowUpdate<'a> {
        WorkflowUpdate {
            name,
            nodes: &self.nodes,
            connections: &self.connections,
            settings: &self.settings,
        }
    }
}

/// Settings n8n assumes when a workflow has none.
pub fn default_settings() -> Map<String, Value> {
    let mut settings = Map::new();
    settings.insert("executionOrder".to_string(), Value::String("v1".to_string()));
    settings
}

fn settings_or_default<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_else(default_settings))
}

impl WorkflowDocument {
    /// Parse the JSON columns of a stored row.
    ///
    /// An empty, NULL or `null` settings column becomes [`default_settings`].
    /// Anything else that fails to parse is an error: a bad column is never
    /// replaced by an empty value.
    pub fn from_row(row: &WorkflowEntityRow) -> Result<Self, SyncError> {
        let nodes = parse_column(&row.id, "nodes", row.nodes.as_deref())?;
        let connections = parse_column(&row.id, "connections", row.connections.as_deref())?;

        let settings = match row.settings.as_deref().map(str::trim) {
            None | Some("") => default_settings(),
            Some(raw) => parse_column::<Option<Map<String, Value>>>(&row.id, "settings", Some(raw))?
                .unwrap_or_else(default_settings),
        };

        Ok(Self {
            name: row.name.clone(),
            nodes,
            connections,
            settings,
        })
    }

    /// Serialize the JSON columns for writing back to the database.
    pub fn to_columns(&self) -> Result<StoredColumns, SyncError> {
        Ok(StoredColumns {
            nodes: serde_json::to_string(&self.nodes)?,
            connections: serde_json::to_string(&self.connections)?,
            settings: serde_json::to_string(&self.settings)?,
        })
    }

    /// File contents: pretty-printed with two-space indentation.
    pub fn to_pretty_json(&self) -> Result<String, SyncError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

fn parse_column<T: DeserializeOwned>(
    id: &str,
    column: &'static str,
    raw: Option<&str>,
) -> Result<T, SyncError> {
    let malformed = |reason: String| SyncError::MalformedStoredData {
        id: id.to_string(),
        column,
        reason,
    };
    let raw = raw.ok_or_else(|| malformed("column is NULL".to_string()))?;
    serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))
}
