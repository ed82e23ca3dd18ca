use crate::command::{Command, CommandArgs, CommandContext, CommandOutput};
use async_trait::async_trait;

/// Thin wrapper over `focus_up` — the active node is considered finished successfully.
pub struct FinishProblemCommand;

#[async_trait]
impl Command for FinishProblemCommand {
    fn name(&self) -> &str {
        "finish_problem"
    }

    fn description(&self) -> &str {
        "Marks the active node finished and returns focus to its parent."
    }

    fn must_be_last(&self) -> bool {
        true
    }

    async fn execute(&self, args: &CommandArgs, ctx: &mut dyn CommandContext) -> CommandOutput {
        if let Some(message) = args.get("message") {
            ctx.add_command_output("finish_problem_message", serde_json::Value::String(message.clone()));
        }
        match ctx.focus_up().await {
            Ok(()) => CommandOutput::text("problem finished"),
            Err(e) => CommandOutput::error(e.to_string()),
        }
    }
}

/// Thin wrapper over `fail_and_focus_up` — the active node is considered Failed.
pub struct FailProblemCommand;

#[async_trait]
impl Command for FailProblemCommand {
    fn name(&self) -> &str {
        "fail_problem"
    }

    fn description(&self) -> &str {
        "Marks the active node Failed and returns focus directly to its parent."
    }

    fn must_be_last(&self) -> bool {
        true
    }

    async fn execute(&self, args: &CommandArgs, ctx: &mut dyn CommandContext) -> CommandOutput {
        let reason = args.get("message").cloned().unwrap_or_else(|| "no reason given".to_string());
        match ctx.fail_and_focus_up(&reason).await {
            Ok(()) => CommandOutput::text("problem failed"),
            Err(e) => CommandOutput::error(e.to_string()),
        }
    }
}
