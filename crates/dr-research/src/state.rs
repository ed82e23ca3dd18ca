//! Per-node state: the problem status plus a per-artifact open/closed flag.
//!
//! Grounded on `original_source/.../research_node_component/state.py`'s `NodeState`
//! dataclass; `node_state.json`'s shape (§6) is this struct's serde form directly.

use dr_core::ProblemStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeState {
    pub artifacts_status: BTreeMap<String, bool>,
    pub problem_status: ProblemStatus,
}

impl NodeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// An artifact's status only takes effect if the key is already present — matches the
    /// source's `set_artifact_status`, which silently no-ops on an unknown name (the artifact
    /// must be registered via `add_artifact` first).
    pub fn set_artifact_status(&mut self, name: &str, is_open: bool) {
        if let Some(slot) = self.artifacts_status.get_mut(name) {
            *slot = is_open;
        }
    }

    pub fn register_artifact(&mut self, name: impl Into<String>, is_open: bool) {
        self.artifacts_status.insert(name.into(), is_open);
    }

    /// Defaults to `true` (open) if the name was never registered, matching the source's
    /// `get_artifact_status`.
    pub fn artifact_is_open(&self, name: &str) -> bool {
        self.artifacts_status.get(name).copied().unwrap_or(true)
    }
}
