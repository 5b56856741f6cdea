//! Registry entry types.

use serde::Serialize;

/// Static metadata for one managed workflow.
///
/// `key` is the human-chosen name used on the command line; `id` is the
/// identifier n8n assigned to the workflow in its database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    pub key: &'static str,
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Canonical document file name inside the workflows directory.
    pub file: &'static str,
    pub version: &'static str,
    /// Declared node count.  Maintained by hand alongside the workflow; it is
    /// never read back from n8n and may drift from the live definition.
    pub nodes: u32,
    pub features: &'static [&'static str],
    pub requirements: Requirements,
    pub triggers: &'static [&'static str],
    pub documentation: &'static [&'static str],
}

/// What has to be set up in n8n before the workflow can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Requirements {
    pub credentials: &'static [&'static str],
    pub configuration: &'static [&'static str],
}

impl Requirements {
    pub const NONE: Self = Self {
        credentials: &[],
        configuration: &[],
    };
}

impl RegistryEntry {
    /// `file` without its `.json` extension.
    pub fn file_stem(&self) -> &'static str {
        self.file.strip_suffix(".json").unwrap_or(self.file)
    }

    /// `true` once the entry declares at least one node.
    pub fn is_configured(&self) -> bool {
        self.nodes > 0
    }
}
