//! `Command` trait and the `CommandContext` facade commands execute against.
//!
//! Grounded on `agenticlaw-tools/src/registry.rs`'s `Tool` trait (`name`/`description`/
//! default-method shape, `async fn execute`) crossed with
//! `original_source/.../command_context.py`'s `CommandContext` facade — every method there
//! proxies straight through to the live engine rather than a snapshot taken at construction
//! time, which is why every accessor here takes `&self`/`&mut self` on the context rather than
//! capturing state up front (Open Question resolution, SPEC_FULL.md §9).

use crate::error::Result;
use dr_core::NodeId;
use dr_research::Research;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub enum CommandOutput {
    Text(String),
    Json(Value),
    Error(String),
}

impl CommandOutput {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn error(s: impl Into<String>) -> Self {
        Self::Error(s.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn into_json(self) -> Value {
        match self {
            Self::Text(s) => Value::String(s),
            Self::Json(v) => v,
            Self::Error(e) => serde_json::json!({ "error": e }),
        }
    }
}

/// Facade over the live engine state a command handler is allowed to touch. Implemented by the
/// engine (not in this crate, to keep `dr-commands` independent of `dr-engine` and avoid a
/// dependency cycle — `dr-engine` depends on `dr-commands`, not the other way around).
#[async_trait::async_trait]
pub trait CommandContext: Send {
    /// The node the next command in this turn's pipeline executes against. Read live off
    /// engine state on every call, never cached — matches `refresh_from_engine()` being a
    /// no-op in the source: there is nothing to refresh because nothing was ever snapshotted.
    fn current_node(&self) -> NodeId;

    fn research(&self) -> &Research;

    fn research_mut(&mut self) -> &mut Research;

    /// Makes an existing child of the current node (created earlier via `add_subproblem`) the
    /// new active node, enqueuing the current node's other children for later focus
    /// (§4.5/§4.6). A thin wrapper over the focus scheduler's transition.
    async fn focus_down(&mut self, child_title: &str) -> Result<()>;

    /// Creates a child of the current node; does not change focus. Fails if a sibling with
    /// that title already exists.
    async fn add_subproblem(&mut self, title: &str, problem_definition: &str) -> Result<()>;

    /// Returns focus to the parent of the current node after it finishes successfully.
    async fn focus_up(&mut self) -> Result<()>;

    /// Marks the current node Failed and returns focus directly to its parent, bypassing the
    /// sibling queue (source's explicit TODO — not implemented here either, SPEC_FULL.md §9).
    async fn fail_and_focus_up(&mut self, reason: &str) -> Result<()>;

    fn add_command_output(&mut self, command_name: &str, output: Value);

    fn add_error_report(&mut self, report: &str);

    fn add_confirmation_request(&mut self, text: &str);

    async fn add_to_permanent_log(&mut self, content: &str) -> Result<()>;

    async fn add_to_knowledge_base(&mut self, title: &str, content: &str) -> Result<()>;
}

/// One command invocation's resolved arguments, already validated against the grammar layer.
pub type CommandArgs = HashMap<String, String>;

#[async_trait::async_trait]
pub trait Command: Send + Sync {
    /// Unique command name as it appears in operator/LLM-facing syntax (e.g. `add_subproblem`).
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// True if this command must be the last one executed in its turn (e.g. `focus_down`,
    /// `finish_problem`, `fail_problem`) — an attribute of the command, not the parser (§6).
    fn must_be_last(&self) -> bool {
        false
    }

    async fn execute(&self, args: &CommandArgs, ctx: &mut dyn CommandContext) -> CommandOutput;
}
