//! File naming for backups.

use chrono::{DateTime, Utc};

/// Derive a file-system safe name from a workflow's display name.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single `-`, and drops leading/trailing dashes.  Different names can map to
/// the same slug; their files then overwrite each other.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Second-precision UTC timestamp that sorts lexically and contains no `:`.
pub fn archive_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H-%M-%S").to_string()
}
