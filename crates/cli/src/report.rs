//! Console rendering of operation results.

use std::error::Error;
use std::fmt::Write as _;
use std::path::Path;

use ops::{BackupSummary, DeploySummary};
use registry::Registry;

fn status(active: bool) -> &'static str {
    if active {
        "Active"
    } else {
        "Inactive"
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `error: cause: cause ...`, one line.
pub fn error_chain(err: &dyn Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(out, ": {cause}");
        source = cause.source();
    }
    out
}

/// Indented detail lines under a "backed up" headline.
pub fn backup_details(s: &BackupSummary) -> String {
    format!(
        "   ID: {}\n   Nodes: {}\n   Status: {}\n   File: {}\n   Backup: {}\n",
        s.id,
        s.node_count,
        status(s.active),
        file_name(&s.workflow_path),
        file_name(&s.backup_path),
    )
}

/// Indented detail lines under a "deployed" headline.
pub fn deploy_details(s: &DeploySummary) -> String {
    format!(
        "   ID: {}\n   Nodes: {}\n   Status: {}\n   File: {}\n",
        s.id,
        s.node_count,
        status(s.active),
        file_name(&s.file),
    )
}

/// Usage block for `deploy`, naming every registered key.
pub fn deploy_usage(registry: &Registry) -> String {
    let mut out = String::from("\nUsage:\n  n8n-workflows deploy <workflow-name>\n  n8n-workflows deploy all\n");
    out.push_str(&available_workflows(registry));
    out
}

pub fn available_workflows(registry: &Registry) -> String {
    let mut out = String::from("\nAvailable workflows:\n");
    for key in registry.keys() {
        let _ = writeln!(out, "  - {key}");
    }
    out
}

/// The static catalog with its declared status.
pub fn registry_catalog(registry: &Registry) -> String {
    let mut out = String::new();
    for entry in registry.entries() {
        let marker = if entry.is_configured() { "✅" } else { "⏳" };
        let _ = writeln!(out, "{marker} {} ({})", entry.key, entry.version);
        let _ = writeln!(out, "   Name: {}", entry.name);
        let _ = writeln!(out, "   ID: {}", entry.id);
        let _ = writeln!(out, "   File: {}", entry.file);
        let _ = writeln!(out, "   Nodes: {}", entry.nodes);
        if !entry.description.is_empty() {
            let _ = writeln!(out, "   {}", entry.description);
        }
        for trigger in entry.triggers {
            let _ = writeln!(out, "   Trigger: {trigger}");
        }
        if !entry.requirements.credentials.is_empty() {
            let _ = writeln!(out, "   Credentials: {}", entry.requirements.credentials.join(", "));
        }
        out.push('\n');
    }

    let summary = registry.summary();
    let _ = writeln!(
        out,
        "Total: {}  Configured: {}  Pending: {}  Nodes: {}",
        summary.total, summary.configured, summary.pending, summary.total_nodes
    );
    out
}
