//! The closed family of dynamic-section snapshots.
//!
//! Each variant is grounded on one `original_source/.../dynamic_sections/*.py`
//! `@dataclass(frozen=True)` — translated as a plain `PartialEq`-derived struct, since Rust's
//! structural equality on owned fields already gives us the "value-equal, immutable snapshot"
//! semantics the source gets from `frozen=True` (see `original_source/.../dynamic_sections/
//! {budget,criteria}.py`).

use dr_core::ProblemStatus;
use serde::{Deserialize, Serialize};

/// Identifies which of the ten canonical sections a snapshot belongs to, independent of its
/// position in a snapshot vector. Used as the renderer-registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    Header,
    PermanentLogs,
    Budget,
    Artifacts,
    ProblemHierarchy,
    Criteria,
    Subproblems,
    ProblemPathHierarchy,
    KnowledgeBase,
    Goal,
}

impl SectionKind {
    /// The fixed canonical ordering the contract requires (§4.4).
    pub const ORDER: [SectionKind; 10] = [
        SectionKind::Header,
        SectionKind::PermanentLogs,
        SectionKind::Budget,
        SectionKind::Artifacts,
        SectionKind::ProblemHierarchy,
        SectionKind::Criteria,
        SectionKind::Subproblems,
        SectionKind::ProblemPathHierarchy,
        SectionKind::KnowledgeBase,
        SectionKind::Goal,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderSectionData {
    pub root_title: String,
    pub active_title: String,
    pub active_status: ProblemStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermanentLogsSectionData {
    pub entries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSectionData {
    pub budget: Option<u32>,
    pub remaining_budget: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactSummary {
    pub name: String,
    pub summary: String,
    pub is_external: bool,
    pub is_open: bool,
    pub owner_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactsSectionData {
    pub items: Vec<ArtifactSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyEntry {
    pub title: String,
    pub status: ProblemStatus,
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemHierarchySectionData {
    pub entries: Vec<HierarchyEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaSectionData {
    pub criteria: Vec<String>,
    pub criteria_done: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubproblemsSectionData {
    pub children: Vec<(String, ProblemStatus)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemPathHierarchySectionData {
    /// Ancestor titles from root down to (and including) the active node.
    pub path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntrySummary {
    pub title: String,
    pub tags: Vec<String>,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseSectionData {
    pub entries: Vec<KnowledgeEntrySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSectionData {
    pub content: String,
}

/// One snapshot of one section, tagged by variant. `PartialEq` is the diffing primitive the
/// aggregator relies on (§4.3, §4.4) — two snapshots of the same variant with equal fields are
/// considered "unchanged", exactly as `original_source`'s frozen dataclasses compare by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DynamicSectionData {
    Header(HeaderSectionData),
    PermanentLogs(PermanentLogsSectionData),
    Budget(BudgetSectionData),
    Artifacts(ArtifactsSectionData),
    ProblemHierarchy(ProblemHierarchySectionData),
    Criteria(CriteriaSectionData),
    Subproblems(SubproblemsSectionData),
    ProblemPathHierarchy(ProblemPathHierarchySectionData),
    KnowledgeBase(KnowledgeBaseSectionData),
    Goal(GoalSectionData),
}

impl DynamicSectionData {
    pub fn kind(&self) -> SectionKind {
        match self {
            DynamicSectionData::Header(_) => SectionKind::Header,
            DynamicSectionData::PermanentLogs(_) => SectionKind::PermanentLogs,
            DynamicSectionData::Budget(_) => SectionKind::Budget,
            DynamicSectionData::Artifacts(_) => SectionKind::Artifacts,
            DynamicSectionData::ProblemHierarchy(_) => SectionKind::ProblemHierarchy,
            DynamicSectionData::Criteria(_) => SectionKind::Criteria,
            DynamicSectionData::Subproblems(_) => SectionKind::Subproblems,
            DynamicSectionData::ProblemPathHierarchy(_) => SectionKind::ProblemPathHierarchy,
            DynamicSectionData::KnowledgeBase(_) => SectionKind::KnowledgeBase,
            DynamicSectionData::Goal(_) => SectionKind::Goal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshots_of_equal_content_are_value_equal() {
        let a = DynamicSectionData::Budget(BudgetSectionData {
            budget: Some(10),
            remaining_budget: Some(4),
        });
        let b = DynamicSectionData::Budget(BudgetSectionData {
            budget: Some(10),
            remaining_budget: Some(4),
        });
        assert_eq!(a, b);
    }

    #[test]
    fn snapshots_differing_in_one_field_are_unequal() {
        let a = DynamicSectionData::Budget(BudgetSectionData {
            budget: Some(10),
            remaining_budget: Some(4),
        });
        let b = DynamicSectionData::Budget(BudgetSectionData {
            budget: Some(10),
            remaining_budget: Some(3),
        });
        assert_ne!(a, b);
    }

    #[test]
    fn canonical_order_has_ten_distinct_kinds() {
        let mut seen = std::collections::HashSet::new();
        for kind in SectionKind::ORDER {
            assert!(seen.insert(kind), "duplicate section kind in canonical order");
        }
        assert_eq!(seen.len(), 10);
    }
}
