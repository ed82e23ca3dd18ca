//! Artifacts: named text documents owned by a node.
//!
//! Grounded on `original_source/.../research_node_component/artifact.py`. Duplicate-name
//! rejection mirrors `ArtifactManager.add_artifact`, which raises rather than overwriting.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub content: String,
    pub short_summary: String,
    pub is_external: bool,
}

impl Artifact {
    pub fn new(name: impl Into<String>, content: impl Into<String>, short_summary: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            short_summary: short_summary.into(),
            is_external: false,
        }
    }
}
