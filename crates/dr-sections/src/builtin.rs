//! Reference renderer implementations for the ten canonical sections.
//!
//! `original_source` renders these via Mako templates (`sections/dynamic/*.mako`); template
//! rendering is out of scope for this system (§1), so these are plain Rust formatters producing
//! equivalent markdown text.

use crate::data::DynamicSectionData;
use crate::renderer::{RendererRegistry, SectionRenderer};

macro_rules! section_renderer {
    ($name:ident, $variant:ident, |$data:ident, $future_changes:ident| $body:expr) => {
        pub struct $name;
        impl SectionRenderer for $name {
            fn render(&self, data: &DynamicSectionData, future_changes: usize) -> String {
                match data {
                    DynamicSectionData::$variant($data) => {
                        let $future_changes = future_changes;
                        $body
                    }
                    other => format!(
                        "<error context=\"{:?}\">renderer/data kind mismatch</error>",
                        other.kind()
                    ),
                }
            }
        }
    };
}

section_renderer!(HeaderRenderer, Header, |data, _future_changes| {
    format!(
        "## Deep Research\nRoot problem: {}\nCurrently focused on: {} ({})",
        data.root_title, data.active_title, data.active_status
    )
});

section_renderer!(PermanentLogsRenderer, PermanentLogs, |data, _fc| {
    if data.entries.is_empty() {
        "### Permanent Logs\n(none)".to_string()
    } else {
        let body = data.entries.join("\n");
        format!("### Permanent Logs\n{body}")
    }
});

section_renderer!(BudgetRenderer, Budget, |data, _fc| {
    match (data.budget, data.remaining_budget) {
        (Some(budget), Some(remaining)) => {
            format!("### Budget\n{remaining} of {budget} message cycles remaining.")
        }
        _ => "### Budget\nUnbudgeted — no cycle limit applies.".to_string(),
    }
});

section_renderer!(ArtifactsRenderer, Artifacts, |data, future_changes| {
    if data.items.is_empty() {
        return "### Artifacts\n(none visible)".to_string();
    }
    let mut out = String::from("### Artifacts\n");
    for item in &data.items {
        let openness = if item.is_open { "open" } else { "closed" };
        let ext = if item.is_external { ", external" } else { "" };
        out.push_str(&format!(
            "- {} ({}{ext}, owner: {}): {}\n",
            item.name, openness, item.owner_title, item.summary
        ));
    }
    if future_changes > 0 {
        out.push_str(&format!(
            "(superseded by {future_changes} later update(s); shown here for history)\n"
        ));
    }
    out
});

section_renderer!(ProblemHierarchyRenderer, ProblemHierarchy, |data, _fc| {
    let mut out = String::from("### Problem Hierarchy\n");
    for entry in &data.entries {
        let indent = "  ".repeat(entry.depth);
        out.push_str(&format!("{indent}- {} [{}]\n", entry.title, entry.status));
    }
    out
});

section_renderer!(CriteriaRenderer, Criteria, |data, _fc| {
    if data.criteria.is_empty() {
        return "### Success Criteria\n(none defined)".to_string();
    }
    let mut out = String::from("### Success Criteria\n");
    for (criterion, done) in data.criteria.iter().zip(data.criteria_done.iter()) {
        let mark = if *done { "x" } else { " " };
        out.push_str(&format!("- [{mark}] {criterion}\n"));
    }
    out
});

section_renderer!(SubproblemsRenderer, Subproblems, |data, _fc| {
    if data.children.is_empty() {
        return "### Subproblems\n(none created yet)".to_string();
    }
    let mut out = String::from("### Subproblems\n");
    for (title, status) in &data.children {
        out.push_str(&format!("- {title} [{status}]\n"));
    }
    out
});

section_renderer!(
    ProblemPathHierarchyRenderer,
    ProblemPathHierarchy,
    |data, _fc| { format!("### Path from Root\n{}", data.path.join(" > ")) }
);

section_renderer!(KnowledgeBaseRenderer, KnowledgeBase, |data, _fc| {
    if data.entries.is_empty() {
        return "### Knowledge Base\n(empty)".to_string();
    }
    let mut out = String::from("### Knowledge Base\n");
    for entry in &data.entries {
        let tags = if entry.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", entry.tags.join(", "))
        };
        out.push_str(&format!("- {} ({}){tags}\n", entry.title, entry.timestamp));
    }
    out
});

section_renderer!(GoalRenderer, Goal, |data, _fc| {
    format!("### Current Goal\n{}", data.content)
});

/// Builds the registry with all ten reference renderers, in the canonical order.
pub fn default_registry() -> RendererRegistry {
    use crate::data::SectionKind::*;
    let mut registry = RendererRegistry::new();
    registry.register(Header, Box::new(HeaderRenderer));
    registry.register(PermanentLogs, Box::new(PermanentLogsRenderer));
    registry.register(Budget, Box::new(BudgetRenderer));
    registry.register(Artifacts, Box::new(ArtifactsRenderer));
    registry.register(ProblemHierarchy, Box::new(ProblemHierarchyRenderer));
    registry.register(Criteria, Box::new(CriteriaRenderer));
    registry.register(Subproblems, Box::new(SubproblemsRenderer));
    registry.register(ProblemPathHierarchy, Box::new(ProblemPathHierarchyRenderer));
    registry.register(KnowledgeBase, Box::new(KnowledgeBaseRenderer));
    registry.register(Goal, Box::new(GoalRenderer));
    registry
}
