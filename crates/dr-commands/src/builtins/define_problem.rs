use crate::command::{Command, CommandArgs, CommandContext, CommandOutput};
use async_trait::async_trait;

/// Creates the root research node. Permitted exactly once, before which every other command
/// fails validation (§4.2 "If the root problem is not yet defined, only `define_problem` is
/// permitted").
pub struct DefineProblemCommand;

#[async_trait]
impl Command for DefineProblemCommand {
    fn name(&self) -> &str {
        "define_problem"
    }

    fn description(&self) -> &str {
        "Defines the root research problem. Must be the first command issued."
    }

    fn must_be_last(&self) -> bool {
        true
    }

    async fn execute(&self, args: &CommandArgs, ctx: &mut dyn CommandContext) -> CommandOutput {
        let Some(content) = args.get("content") else {
            return CommandOutput::error("define_problem requires a 'content' argument");
        };
        if ctx.research().is_initiated() {
            return CommandOutput::error("the root problem is already defined");
        }
        match ctx.research_mut().initiate_research("Root", content).await {
            Ok(_) => CommandOutput::text("root problem defined"),
            Err(e) => CommandOutput::error(e.to_string()),
        }
    }
}
