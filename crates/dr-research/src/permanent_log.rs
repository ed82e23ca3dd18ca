//! Project-wide permanent log: append-only lines surfaced in every node's header section.
//!
//! Grounded on `original_source/.../research_project_component/research.py`'s
//! `_permanent_logs` field and the `add_to_permanent_log` command (SPEC_FULL.md §4.2). Entries
//! are plain lines, one per `add_to_permanent_log` call, never edited or removed once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermanentLogEntry {
    pub timestamp: DateTime<Utc>,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermanentLog {
    entries: Vec<PermanentLogEntry>,
}

impl PermanentLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, content: impl Into<String>, timestamp: DateTime<Utc>) {
        self.entries.push(PermanentLogEntry { timestamp, content: content.into() });
    }

    pub fn entries(&self) -> &[PermanentLogEntry] {
        &self.entries
    }

    /// One line per entry, oldest first, as surfaced in the Header/PermanentLogs section.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("[{}] {}", e.timestamp.to_rfc3339(), e.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_are_kept_in_order() {
        let mut log = PermanentLog::new();
        log.append("first", Utc::now());
        log.append("second", Utc::now());
        assert_eq!(log.entries().len(), 2);
        assert_eq!(log.entries()[0].content, "first");
        assert!(log.render().contains("first"));
        assert!(log.render().contains("second"));
    }

    #[test]
    fn empty_log_renders_empty_string() {
        assert_eq!(PermanentLog::new().render(), "");
    }
}
