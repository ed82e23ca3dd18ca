use crate::command::{Command, CommandArgs, CommandContext, CommandOutput};
use async_trait::async_trait;
use dr_research::Criterion;

pub struct AddCriteriaCommand;

#[async_trait]
impl Command for AddCriteriaCommand {
    fn name(&self) -> &str {
        "add_criteria"
    }

    fn description(&self) -> &str {
        "Appends a success criterion to the active node."
    }

    async fn execute(&self, args: &CommandArgs, ctx: &mut dyn CommandContext) -> CommandOutput {
        let Some(content) = args.get("content") else {
            return CommandOutput::error("add_criteria requires a 'content' argument");
        };
        let node_id = ctx.current_node();
        match ctx.research_mut().tree_mut().get_mut(node_id) {
            Ok(node) => {
                node.criteria.push(Criterion::new(content));
                CommandOutput::text("criterion added")
            }
            Err(e) => CommandOutput::error(e.to_string()),
        }
    }
}

fn toggle(args: &CommandArgs, ctx: &mut dyn CommandContext, completed: bool) -> CommandOutput {
    let Some(index) = args.get("index").and_then(|v| v.parse::<usize>().ok()) else {
        return CommandOutput::error("requires an integer 'index' argument");
    };
    let node_id = ctx.current_node();
    let node = match ctx.research_mut().tree_mut().get_mut(node_id) {
        Ok(node) => node,
        Err(e) => return CommandOutput::error(e.to_string()),
    };
    match node.criteria.get_mut(index) {
        Some(criterion) => {
            if completed {
                criterion.complete();
            } else {
                criterion.uncomplete();
            }
            CommandOutput::text(format!("criterion {index} marked {}", if completed { "done" } else { "not done" }))
        }
        None => CommandOutput::error(format!("criterion index {index} is out of range")),
    }
}

pub struct MarkCriteriaAsDoneCommand;

#[async_trait]
impl Command for MarkCriteriaAsDoneCommand {
    fn name(&self) -> &str {
        "mark_criteria_as_done"
    }

    fn description(&self) -> &str {
        "Marks a success criterion, by position, as completed."
    }

    async fn execute(&self, args: &CommandArgs, ctx: &mut dyn CommandContext) -> CommandOutput {
        toggle(args, ctx, true)
    }
}

pub struct MarkCriteriaAsNotDoneCommand;

#[async_trait]
impl Command for MarkCriteriaAsNotDoneCommand {
    fn name(&self) -> &str {
        "mark_criteria_as_not_done"
    }

    fn description(&self) -> &str {
        "Marks a success criterion, by position, as not completed."
    }

    async fn execute(&self, args: &CommandArgs, ctx: &mut dyn CommandContext) -> CommandOutput {
        toggle(args, ctx, false)
    }
}
