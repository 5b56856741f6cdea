//! The workflow catalog and lookups over it.

use serde::Serialize;

use crate::entry::{RegistryEntry, Requirements};

/// Every workflow this repository manages, in deployment order.
pub const BUILTIN: &[RegistryEntry] = &[
    RegistryEntry {
        key: "catalyst-automation-leads",
        id: "sHsuLUFzwe1d5ji2",
        name: "Catalyst-Automation Leads",
        description: "Automated HVAC lead management with BANT scoring and multi-tier routing",
        file: "catalyst-automation-leads-workflow.json",
        version: "1.0.0",
        nodes: 15,
        features: &[
            "Gmail precision filtering",
            "Residential/Commercial classification",
            "HVAC BANT scoring matrix (0-115 points)",
            "Hot/Warm/Cold lead routing",
            "CRM integration (Google Sheets)",
            "Slack notifications",
            "Automated email responses",
            "KPI tracking",
        ],
        requirements: Requirements {
            credentials: &["Gmail OAuth2", "Google Sheets API", "Slack Webhook", "SMTP Email"],
            configuration: &[
                "Service area ZIP codes",
                "Company branding (name, phone, URLs)",
                "Calendly scheduling link",
                "Partner referral information",
            ],
        },
        triggers: &["Gmail - Email monitoring every 1 minute"],
        documentation: &[
            "n8n/docs/catalyst-automation-leads-setup-guide.md",
            "n8n/docs/catalyst-automation-leads-workflow-summary.md",
        ],
    },
    RegistryEntry {
        key: "catalyst-automation-marketing",
        id: "nKpKjcrJWhmnuecC",
        name: "Catalyst-Automation Marketing",
        description: "Marketing automation workflow (to be configured)",
        file: "catalyst-automation-marketing-workflow.json",
        version: "0.0.0",
        nodes: 0,
        features: &[],
        requirements: Requirements::NONE,
        triggers: &[],
        documentation: &[],
    },
];

/// Aggregate view of a registry.  Counts come from the declared metadata,
/// not from the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistrySummary {
    pub total: usize,
    pub configured: usize,
    pub pending: usize,
    pub total_nodes: u64,
}

/// Read-only view over a static table of entries.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    entries: &'static [RegistryEntry],
}

impl Registry {
    /// The catalog compiled into this binary.
    pub const fn builtin() -> Self {
        Self::new(BUILTIN)
    }

    pub const fn new(entries: &'static [RegistryEntry]) -> Self {
        Self { entries }
    }

    /// All entries, in declaration order.
    pub fn entries(&self) -> &'static [RegistryEntry] {
        self.entries
    }

    pub fn get_by_key(&self, key: &str) -> Option<&'static RegistryEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Linear scan on the n8n identifier.
    pub fn get_by_id(&self, id: &str) -> Option<&'static RegistryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Resolve a command-line target: the registry key, or the document's
    /// file stem (`catalyst-automation-leads-workflow`).
    pub fn resolve(&self, target: &str) -> Option<&'static RegistryEntry> {
        self.get_by_key(target)
            .or_else(|| self.entries.iter().find(|e| e.file_stem() == target))
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.key).collect()
    }

    pub fn all_ids(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// File names of entries that declare one.
    pub fn all_files(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|e| !e.file.is_empty())
            .map(|e| e.file)
            .collect()
    }

    pub fn summary(&self) -> RegistrySummary {
        let configured = self.entries.iter().filter(|e| e.is_configured()).count();
        RegistrySummary {
            total: self.entries.len(),
            configured,
            pending: self.entries.len() - configured,
            total_nodes: self.entries.iter().map(|e| u64::from(e.nodes)).sum(),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
