//! `registry` crate — the static catalog of managed n8n workflows.
//!
//! Maps human-readable keys to n8n identifiers, document file names and
//! descriptive metadata.  The table is compiled in and never written back to
//! the database.

pub mod entry;
pub mod catalog;

pub use catalog::{Registry, RegistrySummary, BUILTIN};
pub use entry::{RegistryEntry, Requirements};
