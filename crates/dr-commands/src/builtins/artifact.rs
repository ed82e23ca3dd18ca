use crate::command::{Command, CommandArgs, CommandContext, CommandOutput};
use async_trait::async_trait;
use dr_research::Artifact;

pub struct AddArtifactCommand;

#[async_trait]
impl Command for AddArtifactCommand {
    fn name(&self) -> &str {
        "add_artifact"
    }

    fn description(&self) -> &str {
        "Adds a named artifact document to the active node. Fails on a duplicate name."
    }

    async fn execute(&self, args: &CommandArgs, ctx: &mut dyn CommandContext) -> CommandOutput {
        let (Some(name), Some(content), Some(summary)) = (args.get("name"), args.get("content"), args.get("summary")) else {
            return CommandOutput::error("add_artifact requires 'name', 'content', and 'summary' arguments");
        };
        let external = args.get("external").map(|v| v == "true").unwrap_or(false);
        let mut artifact = Artifact::new(name, content, summary);
        artifact.is_external = external;

        let node_id = ctx.current_node();
        let result = match ctx.research_mut().tree_mut().get_mut(node_id) {
            Ok(node) => node.add_artifact(artifact),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                if external {
                    if let Err(e) = ctx.research().mirror_external_artifact(node_id).await {
                        return CommandOutput::error(e.to_string());
                    }
                }
                CommandOutput::text(format!("artifact '{name}' added"))
            }
            Err(e) => CommandOutput::error(e.to_string()),
        }
    }
}

pub struct AppendToArtifactCommand;

#[async_trait]
impl Command for AppendToArtifactCommand {
    fn name(&self) -> &str {
        "append_to_artifact"
    }

    fn description(&self) -> &str {
        "Appends content to an existing artifact. Fails if the artifact does not exist."
    }

    async fn execute(&self, args: &CommandArgs, ctx: &mut dyn CommandContext) -> CommandOutput {
        let (Some(name), Some(content)) = (args.get("name"), args.get("content")) else {
            return CommandOutput::error("append_to_artifact requires 'name' and 'content' arguments");
        };
        let node_id = ctx.current_node();
        let node = match ctx.research_mut().tree_mut().get_mut(node_id) {
            Ok(node) => node,
            Err(e) => return CommandOutput::error(e.to_string()),
        };
        match node.find_artifact_mut(name) {
            Some(artifact) => {
                artifact.content.push('\n');
                artifact.content.push_str(content);
                CommandOutput::text(format!("appended to artifact '{name}'"))
            }
            None => CommandOutput::error(format!("no artifact named '{name}' on this node")),
        }
    }
}

fn set_open(args: &CommandArgs, ctx: &mut dyn CommandContext, is_open: bool) -> CommandOutput {
    let Some(name) = args.get("name") else {
        return CommandOutput::error("requires a 'name' argument");
    };
    let node_id = ctx.current_node();
    let node = match ctx.research_mut().tree_mut().get_mut(node_id) {
        Ok(node) => node,
        Err(e) => return CommandOutput::error(e.to_string()),
    };
    if node.find_artifact(name).is_none() {
        return CommandOutput::error(format!("no artifact named '{name}' on this node"));
    }
    node.state.set_artifact_status(name, is_open);
    CommandOutput::text(format!("artifact '{name}' marked {}", if is_open { "open" } else { "closed" }))
}

pub struct OpenArtifactCommand;

#[async_trait]
impl Command for OpenArtifactCommand {
    fn name(&self) -> &str {
        "open_artifact"
    }

    fn description(&self) -> &str {
        "Marks an artifact visible in the Artifacts section."
    }

    async fn execute(&self, args: &CommandArgs, ctx: &mut dyn CommandContext) -> CommandOutput {
        set_open(args, ctx, true)
    }
}

pub struct CloseArtifactCommand;

#[async_trait]
impl Command for CloseArtifactCommand {
    fn name(&self) -> &str {
        "close_artifact"
    }

    fn description(&self) -> &str {
        "Marks an artifact hidden from the Artifacts section."
    }

    async fn execute(&self, args: &CommandArgs, ctx: &mut dyn CommandContext) -> CommandOutput {
        set_open(args, ctx, false)
    }
}
