//! The live [`dr_commands::CommandContext`] implementation: wires built-in commands to the
//! engine's research tree, focus scheduler, and per-turn execution state.
//!
//! Grounded on `original_source/.../command_context.py`'s facade surface (`current_node`,
//! `focus_down`/`focus_up`/`fail_and_focus_up`, `add_command_output`, `add_to_permanent_log`).

use crate::scheduler::{FocusOutcome, FocusScheduler};
use crate::state::ExecutionState;
use async_trait::async_trait;
use dr_commands::{CommandContext, Error, Result};
use dr_core::NodeId;
use dr_research::Research;
use serde_json::Value;

fn from_scheduler_error(err: crate::scheduler::Error) -> Error {
    match err {
        crate::scheduler::Error::UnknownChild(parent, child) => Error::Validation(format!("node '{parent}' has no child named '{child}'")),
        crate::scheduler::Error::Research(e) => Error::from(e),
    }
}

pub struct EngineCommandContext<'a> {
    research: &'a mut Research,
    active: NodeId,
    exec_state: &'a mut ExecutionState,
    scheduler: &'a mut FocusScheduler,
    /// Set when `focus_up`/`fail_and_focus_up` ends the run (root node reached a terminal
    /// status). The engine loop inspects this after `CommandPipeline::process` returns.
    run_ended: Option<Option<String>>,
}

impl<'a> EngineCommandContext<'a> {
    pub fn new(research: &'a mut Research, active: NodeId, exec_state: &'a mut ExecutionState, scheduler: &'a mut FocusScheduler) -> Self {
        Self { research, active, exec_state, scheduler, run_ended: None }
    }

    /// `Some(message)` if the run ended this turn (root node reached Finished or Failed).
    pub fn take_run_ended(&mut self) -> Option<Option<String>> {
        self.run_ended.take()
    }
}

#[async_trait]
impl<'a> CommandContext for EngineCommandContext<'a> {
    fn current_node(&self) -> NodeId {
        self.active
    }

    fn research(&self) -> &Research {
        self.research
    }

    fn research_mut(&mut self) -> &mut Research {
        self.research
    }

    async fn focus_down(&mut self, child_title: &str) -> Result<()> {
        self.scheduler
            .focus_down(self.research, self.exec_state, self.active, child_title)
            .map_err(from_scheduler_error)
    }

    async fn add_subproblem(&mut self, title: &str, problem_definition: &str) -> Result<()> {
        let id = self.research.tree_mut().add_child(self.active, title, problem_definition)?;
        self.research.finalize_new_child(id).await?;
        Ok(())
    }

    async fn focus_up(&mut self) -> Result<()> {
        let outcome = self
            .scheduler
            .focus_up(self.research, self.exec_state, self.active, None)
            .map_err(from_scheduler_error)?;
        if let FocusOutcome::RunEnded { message } = outcome {
            self.run_ended = Some(message);
        }
        Ok(())
    }

    async fn fail_and_focus_up(&mut self, reason: &str) -> Result<()> {
        let outcome = self
            .scheduler
            .fail_and_focus_up(self.research, self.exec_state, self.active, reason)
            .map_err(from_scheduler_error)?;
        if let FocusOutcome::RunEnded { message } = outcome {
            self.run_ended = Some(message);
        }
        Ok(())
    }

    fn add_command_output(&mut self, command_name: &str, output: Value) {
        if let Ok(node) = self.research.tree_mut().get_mut(self.active) {
            node.history.aggregator_mut().add_command_output(command_name, output);
        }
    }

    fn add_error_report(&mut self, report: &str) {
        if let Ok(node) = self.research.tree_mut().get_mut(self.active) {
            node.history.aggregator_mut().add_error_report(report);
        }
    }

    fn add_confirmation_request(&mut self, text: &str) {
        if let Ok(node) = self.research.tree_mut().get_mut(self.active) {
            node.history.aggregator_mut().add_confirmation_request(text);
        }
    }

    async fn add_to_permanent_log(&mut self, content: &str) -> Result<()> {
        self.research.add_to_permanent_log(content).await?;
        Ok(())
    }

    async fn add_to_knowledge_base(&mut self, title: &str, content: &str) -> Result<()> {
        self.research.add_to_knowledge_base(title, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dr_research::LocalFsDriver;

    #[tokio::test]
    async fn focus_down_moves_future_state() {
        let tmp = tempfile::tempdir().unwrap();
        let mut research = Research::new(Box::new(LocalFsDriver::new(tmp.path())));
        let root = research.initiate_research("Root", "study x").await.unwrap();
        let child_id = research.tree_mut().add_child(root, "Child", "c").unwrap();
        research.finalize_new_child(child_id).await.unwrap();

        let mut exec_state = ExecutionState::new();
        exec_state.set_active(root);
        let mut scheduler = FocusScheduler::new();
        let mut ctx = EngineCommandContext::new(&mut research, root, &mut exec_state, &mut scheduler);

        ctx.focus_down("Child").await.unwrap();
        assert_eq!(exec_state.future(), Some(child_id));
    }

    #[tokio::test]
    async fn focus_up_on_root_records_run_ended() {
        let tmp = tempfile::tempdir().unwrap();
        let mut research = Research::new(Box::new(LocalFsDriver::new(tmp.path())));
        let root = research.initiate_research("Root", "study x").await.unwrap();

        let mut exec_state = ExecutionState::new();
        exec_state.set_active(root);
        let mut scheduler = FocusScheduler::new();
        let mut ctx = EngineCommandContext::new(&mut research, root, &mut exec_state, &mut scheduler);

        ctx.focus_up().await.unwrap();
        assert_eq!(ctx.take_run_ended(), Some(None));
    }
}
