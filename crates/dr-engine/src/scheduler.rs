//! The focus scheduler: `focus_down` / `focus_up` / `fail_and_focus_up` and the shutdown
//! sentinel check.
//!
//! Grounded on `original_source/.../engine/engine.py`'s `focus_down`, `focus_up`,
//! `fail_and_focus_up`, and `_handle_shutdown_request`. Status writes always happen before the
//! aggregator append, so a parent observing the transition sees the child already terminal.

use crate::state::{ChildrenQueue, ExecutionState};
use dr_core::{NodeId, ProblemStatus, SHUTDOWN_SENTINEL};
use dr_research::Research;

const FINISH_NOTE: &str = "Task marked FINISHED, focusing back up.";
const FAIL_NOTE: &str = "Task marked FAILED, focusing back up.";

/// What happened as a result of a `focus_up` / `fail_and_focus_up` call.
#[derive(Debug, Clone, PartialEq)]
pub enum FocusOutcome {
    /// Execution continues at a new active node (already written into `ExecutionState`).
    Continued,
    /// The root node reached a terminal state; the run is over.
    RunEnded { message: Option<String> },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("node '{0}' has no child named '{1}'")]
    UnknownChild(String, String),
    #[error(transparent)]
    Research(#[from] dr_research::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Default)]
pub struct FocusScheduler {
    children_queue: ChildrenQueue,
}

impl FocusScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children_queue_mut(&mut self) -> &mut ChildrenQueue {
        &mut self.children_queue
    }

    /// Sets the active node's status to `Pending` and queues `child_title` as the next active
    /// node. Fails if the active node has no such child.
    pub fn focus_down(&mut self, research: &mut Research, state: &mut ExecutionState, active: NodeId, child_title: &str) -> Result<()> {
        let child = research
            .tree()
            .find_child_by_title(active, child_title)
            .ok_or_else(|| Error::UnknownChild(research.tree().get(active).map(|n| n.title.clone()).unwrap_or_default(), child_title.to_string()))?;
        research.tree_mut().get_mut(active)?.set_status(ProblemStatus::Pending);
        state.set_future(child);
        Ok(())
    }

    /// Marks `active` Finished. On the root this ends the run; otherwise it notifies the
    /// parent and moves focus to the next queued sibling (or back to the parent).
    pub fn focus_up(&mut self, research: &mut Research, state: &mut ExecutionState, active: NodeId, message: Option<&str>) -> Result<FocusOutcome> {
        self.finish_node(research, state, active, message, ProblemStatus::Finished, FINISH_NOTE, "[Completion Message]:", true)
    }

    /// Marks `active` Failed. Mirrors `focus_up`, except the parent is always the next active
    /// node — the children queue is never consulted on failure.
    pub fn fail_and_focus_up(&mut self, research: &mut Research, state: &mut ExecutionState, active: NodeId, reason: &str) -> Result<FocusOutcome> {
        self.finish_node(research, state, active, Some(reason), ProblemStatus::Failed, FAIL_NOTE, "[Failure Message]:", false)
    }

    #[allow(clippy::too_many_arguments)]
    fn finish_node(
        &mut self,
        research: &mut Research,
        state: &mut ExecutionState,
        active: NodeId,
        message: Option<&str>,
        status: ProblemStatus,
        note: &str,
        message_prefix: &str,
        consult_queue: bool,
    ) -> Result<FocusOutcome> {
        let active_title = research.tree().get(active)?.title.clone();
        let parent = research.tree().get(active)?.parent;
        research.tree_mut().get_mut(active)?.set_status(status);

        let Some(parent) = parent else {
            state.set_awaiting_new_instruction(true);
            return Ok(FocusOutcome::RunEnded { message: message.map(|m| m.to_string()) });
        };

        let parent_title = research.tree().get(parent)?.title.clone();
        {
            let parent_node = research.tree_mut().get_mut(parent)?;
            parent_node.history.aggregator_mut().add_internal_message(&active_title, note);
            if let Some(text) = message.filter(|m| !m.is_empty()) {
                parent_node.history.aggregator_mut().add_internal_message(&active_title, &format!("{message_prefix} {text}"));
            }
        }

        let next = if consult_queue {
            self.children_queue
                .pop(&parent_title)
                .and_then(|title| research.tree().find_child_by_title(parent, &title))
                .unwrap_or(parent)
        } else {
            parent
        };
        state.set_future(next);
        Ok(FocusOutcome::Continued)
    }

    /// Checks the assistant's raw response for the shutdown sentinel (§6). Returns `true` if
    /// the run was terminated as a result. Ignored (with a diagnostic) on non-root nodes.
    pub fn handle_shutdown_sentinel(&mut self, research: &mut Research, state: &mut ExecutionState, active: NodeId, response: &str) -> Result<bool> {
        if !response.to_lowercase().contains(&SHUTDOWN_SENTINEL.to_lowercase()) {
            return Ok(false);
        }
        if active != research.tree().root() {
            tracing::warn!(node = %active, "shutdown sentinel seen on a non-root node, ignoring");
            return Ok(false);
        }
        research.tree_mut().get_mut(active)?.set_status(ProblemStatus::Finished);
        state.set_awaiting_new_instruction(true);
        Ok(true)
    }
}
