//! Project-wide knowledge base: `_knowledge_base.md`, entries separated by a literal marker.
//!
//! Grounded on `original_source/.../research_project_component/knowledge_base.py`. The
//! separator string and its padding are kept byte-for-byte identical
//! (`dr_core::KNOWLEDGE_ENTRY_SEPARATOR`) for round-trip fidelity with files the source writes.

use crate::frontmatter;
use chrono::{DateTime, Utc};
use dr_core::KNOWLEDGE_ENTRY_SEPARATOR;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub title: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub tags: Vec<String>,
    pub source: Option<String>,
    pub importance: u32,
    pub confidence: u32,
}

impl KnowledgeEntry {
    pub fn new(title: impl Into<String>, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            timestamp,
            tags: Vec::new(),
            source: None,
            importance: 1,
            confidence: 1,
        }
    }

    fn to_frontmatter_doc(&self) -> String {
        let tags = self.tags.join(",");
        let source = self.source.clone().unwrap_or_default();
        frontmatter::write(
            &[
                ("title", self.title.clone()),
                ("timestamp", self.timestamp.to_rfc3339()),
                ("tags", tags),
                ("source", source),
                ("importance", self.importance.to_string()),
                ("confidence", self.confidence.to_string()),
            ],
            &self.content,
        )
    }

    fn from_frontmatter_doc(doc: &str) -> Option<Self> {
        let (fields, body) = frontmatter::parse(doc);
        let title = fields.get("title")?.clone();
        let timestamp = fields
            .get("timestamp")
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);
        let tags = fields
            .get("tags")
            .map(|t| t.split(',').filter(|s| !s.is_empty()).map(str::to_string).collect())
            .unwrap_or_default();
        let source = fields.get("source").filter(|s| !s.is_empty()).cloned();
        let importance = fields.get("importance").and_then(|v| v.parse().ok()).unwrap_or(1);
        let confidence = fields.get("confidence").and_then(|v| v.parse().ok()).unwrap_or(1);
        Some(Self { title, content: body, timestamp, tags, source, importance, confidence })
    }
}

#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, entry: KnowledgeEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    /// Entries sorted by timestamp, as written to disk (source sorts before every save).
    pub fn to_file_string(&self) -> String {
        let mut sorted = self.entries.clone();
        sorted.sort_by_key(|e| e.timestamp);
        sorted
            .iter()
            .map(KnowledgeEntry::to_frontmatter_doc)
            .collect::<Vec<_>>()
            .join(KNOWLEDGE_ENTRY_SEPARATOR)
    }

    pub fn from_file_string(content: &str) -> Self {
        if content.trim().is_empty() {
            return Self::default();
        }
        let entries = content
            .split(KNOWLEDGE_ENTRY_SEPARATOR)
            .filter_map(KnowledgeEntry::from_frontmatter_doc)
            .collect();
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_file_string() {
        let mut kb = KnowledgeBase::new();
        kb.add_entry(KnowledgeEntry::new("Finding A", "content A", Utc::now()));
        kb.add_entry(KnowledgeEntry::new("Finding B", "content B", Utc::now()));
        let rendered = kb.to_file_string();
        assert!(rendered.contains("HERMES_KNOWLEDGE_ENTRY_SEPARATOR"));
        let parsed = KnowledgeBase::from_file_string(&rendered);
        assert_eq!(parsed.entries().len(), 2);
        assert_eq!(parsed.entries()[0].title, "Finding A");
    }

    #[test]
    fn empty_file_parses_to_no_entries() {
        let kb = KnowledgeBase::from_file_string("");
        assert!(kb.entries().is_empty());
    }
}
