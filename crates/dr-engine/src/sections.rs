//! Factory functions building each of the ten canonical [`DynamicSectionData`] variants from the
//! live research tree. Centralized here, rather than in `dr-sections`, to avoid a dependency
//! cycle between the tree crate and the section-data crate (§9 Design Note).
//!
//! Each function is grounded on the corresponding `original_source/.../dynamic_sections/*.py`
//! module's static factory (e.g. `HeaderSection.from_node`, `BudgetSection.from_node`).

use crate::budget::BudgetController;
use dr_core::NodeId;
use dr_research::Research;
use dr_sections::data::{
    ArtifactSummary, ArtifactsSectionData, BudgetSectionData, CriteriaSectionData, DynamicSectionData, GoalSectionData, HeaderSectionData,
    HierarchyEntry, KnowledgeBaseSectionData, KnowledgeEntrySummary, PermanentLogsSectionData, ProblemHierarchySectionData,
    ProblemPathHierarchySectionData, SubproblemsSectionData,
};

/// Builds all ten dynamic section snapshots for `active`, in canonical order (§4.4).
pub fn snapshot_all(research: &Research, active: NodeId, budget: &BudgetController) -> Vec<DynamicSectionData> {
    vec![
        DynamicSectionData::Header(header(research, active)),
        DynamicSectionData::PermanentLogs(permanent_logs(research)),
        DynamicSectionData::Budget(budget_section(budget)),
        DynamicSectionData::Artifacts(artifacts(research, active)),
        DynamicSectionData::ProblemHierarchy(problem_hierarchy(research)),
        DynamicSectionData::Criteria(criteria(research, active)),
        DynamicSectionData::Subproblems(subproblems(research, active)),
        DynamicSectionData::ProblemPathHierarchy(problem_path_hierarchy(research, active)),
        DynamicSectionData::KnowledgeBase(knowledge_base(research)),
        DynamicSectionData::Goal(goal(research, active)),
    ]
}

fn header(research: &Research, active: NodeId) -> HeaderSectionData {
    let tree = research.tree();
    let root_title = tree.get(tree.root()).map(|n| n.title.clone()).unwrap_or_default();
    let active_node = tree.get(active);
    HeaderSectionData {
        root_title,
        active_title: active_node.map(|n| n.title.clone()).unwrap_or_default(),
        active_status: active_node.map(|n| n.status()).unwrap_or_default(),
    }
}

fn permanent_logs(research: &Research) -> PermanentLogsSectionData {
    PermanentLogsSectionData { entries: research.permanent_log().entries().iter().map(|e| e.content.clone()).collect() }
}

fn budget_section(budget: &BudgetController) -> BudgetSectionData {
    BudgetSectionData { budget: budget.total_budget(), remaining_budget: budget.remaining() }
}

fn artifacts(research: &Research, active: NodeId) -> ArtifactsSectionData {
    let items = research
        .tree()
        .visible_artifacts(active)
        .into_iter()
        .map(|a| ArtifactSummary { name: a.name, summary: a.summary, is_external: a.is_external, is_open: a.is_open, owner_title: a.owner_title })
        .collect();
    ArtifactsSectionData { items }
}

fn problem_hierarchy(research: &Research) -> ProblemHierarchySectionData {
    let tree = research.tree();
    let entries = tree
        .walk()
        .into_iter()
        .filter_map(|(id, depth)| tree.get(id).ok().map(|n| HierarchyEntry { title: n.title.clone(), status: n.status(), depth }))
        .collect();
    ProblemHierarchySectionData { entries }
}

fn criteria(research: &Research, active: NodeId) -> CriteriaSectionData {
    match research.tree().get(active) {
        Ok(node) => CriteriaSectionData {
            criteria: node.criteria.iter().map(|c| c.content.clone()).collect(),
            criteria_done: node.criteria.iter().map(|c| c.is_completed).collect(),
        },
        Err(_) => CriteriaSectionData { criteria: Vec::new(), criteria_done: Vec::new() },
    }
}

fn subproblems(research: &Research, active: NodeId) -> SubproblemsSectionData {
    let tree = research.tree();
    let children = match tree.get(active) {
        Ok(node) => node.children.iter().filter_map(|&id| tree.get(id).ok().map(|n| (n.title.clone(), n.status()))).collect(),
        Err(_) => Vec::new(),
    };
    SubproblemsSectionData { children }
}

fn problem_path_hierarchy(research: &Research, active: NodeId) -> ProblemPathHierarchySectionData {
    let tree = research.tree();
    let path = tree.path_from_root(active).into_iter().filter_map(|id| tree.get(id).ok().map(|n| n.title.clone())).collect();
    ProblemPathHierarchySectionData { path }
}

fn knowledge_base(research: &Research) -> KnowledgeBaseSectionData {
    let entries = research
        .knowledge_base()
        .entries()
        .iter()
        .map(|e| KnowledgeEntrySummary { title: e.title.clone(), tags: e.tags.clone(), timestamp: e.timestamp.to_rfc3339() })
        .collect();
    KnowledgeBaseSectionData { entries }
}

fn goal(research: &Research, active: NodeId) -> GoalSectionData {
    GoalSectionData { content: research.tree().get(active).map(|n| n.problem_definition.clone()).unwrap_or_default() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dr_research::LocalFsDriver;

    #[tokio::test]
    async fn snapshot_all_produces_ten_sections_in_canonical_order() {
        let tmp = tempfile::tempdir().unwrap();
        let mut research = Research::new(Box::new(LocalFsDriver::new(tmp.path())));
        let root = research.initiate_research("Root", "study x").await.unwrap();
        let budget = BudgetController::new(Some(10));

        let snapshots = snapshot_all(&research, root, &budget);
        assert_eq!(snapshots.len(), 10);
        for (snapshot, kind) in snapshots.iter().zip(dr_sections::SectionKind::ORDER) {
            assert_eq!(snapshot.kind(), kind);
        }
    }

    #[tokio::test]
    async fn goal_section_reflects_active_node_problem_definition() {
        let tmp = tempfile::tempdir().unwrap();
        let mut research = Research::new(Box::new(LocalFsDriver::new(tmp.path())));
        let root = research.initiate_research("Root", "study the thing").await.unwrap();
        let budget = BudgetController::new(None);
        let snapshots = snapshot_all(&research, root, &budget);
        match &snapshots[9] {
            DynamicSectionData::Goal(g) => assert_eq!(g.content, "study the thing"),
            _ => panic!("expected Goal section last"),
        }
    }
}
