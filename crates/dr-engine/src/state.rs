//! Execution-state bookkeeping: which node is active now, which one will be active after the
//! current turn finishes, and the per-parent queue of siblings waiting their turn.
//!
//! Grounded on `original_source/.../engine/engine.py`'s `current_execution_state` /
//! `future_execution_state` swap-at-end-of-turn pattern and its `children_queue:
//! defaultdict(list)`.

use dr_core::NodeId;
use std::collections::{HashMap, VecDeque};

/// Tracks the node the loop is currently operating on and the node it should move to once the
/// turn completes. The two are kept separate so that a command executed mid-turn (e.g.
/// `focus_down`) only takes effect at the turn boundary, matching the source's
/// read-now/apply-later split.
#[derive(Debug, Default)]
pub struct ExecutionState {
    active: Option<NodeId>,
    future: Option<NodeId>,
    awaiting_new_instruction: bool,
}

impl ExecutionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    pub fn set_active(&mut self, node: NodeId) {
        self.active = Some(node);
    }

    pub fn future(&self) -> Option<NodeId> {
        self.future
    }

    pub fn set_future(&mut self, node: NodeId) {
        self.future = Some(node);
    }

    /// Moves `future` into `active` at the end of a turn, as `engine.py`'s loop does before
    /// re-entering.
    pub fn advance(&mut self) {
        if let Some(next) = self.future.take() {
            self.active = Some(next);
        }
    }

    pub fn awaiting_new_instruction(&self) -> bool {
        self.awaiting_new_instruction
    }

    pub fn set_awaiting_new_instruction(&mut self, awaiting: bool) {
        self.awaiting_new_instruction = awaiting;
    }
}

/// FIFO queues of sibling titles waiting to be focused, keyed by parent title. Populated
/// externally (no built-in command currently pushes onto it, matching the source) and consumed
/// only by [`crate::scheduler::FocusScheduler::focus_up`]'s success path.
#[derive(Debug, Default)]
pub struct ChildrenQueue {
    queues: HashMap<String, VecDeque<String>>,
}

impl ChildrenQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, parent_title: &str, child_title: impl Into<String>) {
        self.queues.entry(parent_title.to_string()).or_default().push_back(child_title.into());
    }

    /// Pops the next queued sibling title for `parent_title`, if any are waiting.
    pub fn pop(&mut self, parent_title: &str) -> Option<String> {
        let queue = self.queues.get_mut(parent_title)?;
        let next = queue.pop_front();
        if queue.is_empty() {
            self.queues.remove(parent_title);
        }
        next
    }

    pub fn is_empty_for(&self, parent_title: &str) -> bool {
        self.queues.get(parent_title).map(|q| q.is_empty()).unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_future_into_active() {
        let mut state = ExecutionState::new();
        state.set_active(NodeId(0));
        state.set_future(NodeId(1));
        state.advance();
        assert_eq!(state.active(), Some(NodeId(1)));
    }

    #[test]
    fn advance_without_future_keeps_active() {
        let mut state = ExecutionState::new();
        state.set_active(NodeId(0));
        state.advance();
        assert_eq!(state.active(), Some(NodeId(0)));
    }

    #[test]
    fn children_queue_is_fifo_per_parent() {
        let mut queue = ChildrenQueue::new();
        queue.push("Root", "A");
        queue.push("Root", "B");
        assert_eq!(queue.pop("Root"), Some("A".to_string()));
        assert_eq!(queue.pop("Root"), Some("B".to_string()));
        assert_eq!(queue.pop("Root"), None);
    }

    #[test]
    fn empty_for_unknown_parent_is_true() {
        let queue = ChildrenQueue::new();
        assert!(queue.is_empty_for("Nobody"));
    }
}
