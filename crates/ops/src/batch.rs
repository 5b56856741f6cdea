//! Per-record outcomes of an "all" run.

use crate::SyncError;

/// One attempted record: a label for humans and what happened.
#[derive(Debug)]
pub struct BatchEntry<T> {
    pub target: String,
    pub result: Result<T, SyncError>,
}

/// Outcomes in processing order.  A failed record never stops the ones after it.
#[derive(Debug)]
pub struct BatchReport<T> {
    pub entries: Vec<BatchEntry<T>>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> BatchReport<T> {
    pub fn push(&mut self, target: impl Into<String>, result: Result<T, SyncError>) {
        self.entries.push(BatchEntry {
            target: target.into(),
            result,
        });
    }

    /// Nothing matched, so nothing was attempted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }

    /// At least one record was attempted and none of them worked.
    pub fn all_failed(&self) -> bool {
        !self.is_empty() && self.succeeded() == 0
    }
}
