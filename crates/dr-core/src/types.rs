//! Small value types shared across every crate in the workspace.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable index into a research tree arena.
///
/// Newtype over `usize` so a raw index can never be passed where a node id is expected —
/// mirrors the teacher's `SessionKey(Arc<str>)` newtype-over-primitive convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle status of a research node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemStatus {
    NotStarted,
    InProgress,
    Pending,
    Finished,
    Failed,
}

impl Default for ProblemStatus {
    fn default() -> Self {
        ProblemStatus::NotStarted
    }
}

impl fmt::Display for ProblemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProblemStatus::NotStarted => "NOT_STARTED",
            ProblemStatus::InProgress => "IN_PROGRESS",
            ProblemStatus::Pending => "PENDING",
            ProblemStatus::Finished => "FINISHED",
            ProblemStatus::Failed => "FAILED",
        };
        write!(f, "{s}")
    }
}

/// The exact, case-insensitive phrase that terminates a run when issued from the root node.
pub const SHUTDOWN_SENTINEL: &str = "SHUT_DOWN_DEEP_RESEARCHER";

/// Literal separator between entries in `_knowledge_base.md`.
///
/// Kept byte-for-byte identical to `original_source`'s `KnowledgeBase._knowledge_separator`
/// (padded with a blank line on either side) so a file written by this engine and one written
/// by the source implementation are interchangeable.
pub const KNOWLEDGE_ENTRY_SEPARATOR: &str = "\n\n<!-- HERMES_KNOWLEDGE_ENTRY_SEPARATOR -->\n\n";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_root_is_zero() {
        assert_eq!(NodeId::ROOT.index(), 0);
    }

    #[test]
    fn problem_status_default_is_not_started() {
        assert_eq!(ProblemStatus::default(), ProblemStatus::NotStarted);
    }

    #[test]
    fn problem_status_round_trips_through_json() {
        for status in [
            ProblemStatus::NotStarted,
            ProblemStatus::InProgress,
            ProblemStatus::Pending,
            ProblemStatus::Finished,
            ProblemStatus::Failed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            let back: ProblemStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(status, back);
        }
    }
}
