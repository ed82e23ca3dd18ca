//! Built-in command vocabulary (SPEC_FULL.md §4.2), supplemented from `original_source`'s
//! command modules since the distilled spec names the pipeline's mechanics but not its full
//! vocabulary.

mod artifact;
mod criteria;
mod define_problem;
mod finish_fail;
mod knowledge;
mod subproblem;

pub use artifact::{AddArtifactCommand, AppendToArtifactCommand, CloseArtifactCommand, OpenArtifactCommand};
pub use criteria::{AddCriteriaCommand, MarkCriteriaAsDoneCommand, MarkCriteriaAsNotDoneCommand};
pub use define_problem::DefineProblemCommand;
pub use finish_fail::{FailProblemCommand, FinishProblemCommand};
pub use knowledge::{AddToKnowledgeBaseCommand, AddToPermanentLogCommand};
pub use subproblem::{AddSubproblemCommand, FocusDownCommand};

use crate::registry::CommandRegistry;

/// Registers every built-in command listed in SPEC_FULL.md §4.2.
pub fn register_builtins(registry: &mut CommandRegistry) {
    registry.register(DefineProblemCommand);
    registry.register(AddSubproblemCommand);
    registry.register(FocusDownCommand);
    registry.register(AddCriteriaCommand);
    registry.register(MarkCriteriaAsDoneCommand);
    registry.register(MarkCriteriaAsNotDoneCommand);
    registry.register(AddArtifactCommand);
    registry.register(AppendToArtifactCommand);
    registry.register(OpenArtifactCommand);
    registry.register(CloseArtifactCommand);
    registry.register(AddToKnowledgeBaseCommand);
    registry.register(AddToPermanentLogCommand);
    registry.register(FinishProblemCommand);
    registry.register(FailProblemCommand);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_every_builtin_by_name() {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);
        for name in [
            "define_problem",
            "add_subproblem",
            "focus_down",
            "add_criteria",
            "mark_criteria_as_done",
            "mark_criteria_as_not_done",
            "add_artifact",
            "append_to_artifact",
            "open_artifact",
            "close_artifact",
            "add_to_knowledge_base",
            "add_to_permanent_log",
            "finish_problem",
            "fail_problem",
        ] {
            assert!(registry.get(name).is_some(), "missing builtin command '{name}'");
        }
    }
}
