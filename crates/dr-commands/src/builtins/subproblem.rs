use crate::command::{Command, CommandArgs, CommandContext, CommandOutput};
use async_trait::async_trait;

/// Creates a child of the active node without moving focus onto it.
pub struct AddSubproblemCommand;

#[async_trait]
impl Command for AddSubproblemCommand {
    fn name(&self) -> &str {
        "add_subproblem"
    }

    fn description(&self) -> &str {
        "Adds a child research node under the active node."
    }

    async fn execute(&self, args: &CommandArgs, ctx: &mut dyn CommandContext) -> CommandOutput {
        let (Some(title), Some(content)) = (args.get("title"), args.get("content")) else {
            return CommandOutput::error("add_subproblem requires 'title' and 'content' arguments");
        };
        match ctx.add_subproblem(title, content).await {
            Ok(()) => CommandOutput::text(format!("added subproblem '{title}'")),
            Err(e) => CommandOutput::error(e.to_string()),
        }
    }
}

/// Moves focus onto an existing child of the active node; a thin wrapper over the focus
/// scheduler's transition (§4.2).
pub struct FocusDownCommand;

#[async_trait]
impl Command for FocusDownCommand {
    fn name(&self) -> &str {
        "focus_down"
    }

    fn description(&self) -> &str {
        "Moves focus to an existing subproblem of the active node."
    }

    fn must_be_last(&self) -> bool {
        true
    }

    async fn execute(&self, args: &CommandArgs, ctx: &mut dyn CommandContext) -> CommandOutput {
        let Some(title) = args.get("subproblem_title") else {
            return CommandOutput::error("focus_down requires a 'subproblem_title' argument");
        };
        match ctx.focus_down(title).await {
            Ok(()) => CommandOutput::text(format!("focus moved to '{title}'")),
            Err(e) => CommandOutput::error(e.to_string()),
        }
    }
}
