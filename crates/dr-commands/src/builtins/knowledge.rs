use crate::command::{Command, CommandArgs, CommandContext, CommandOutput};
use async_trait::async_trait;
use chrono::Utc;
use dr_research::KnowledgeEntry;

/// Appends a dated entry to the project-wide knowledge base.
pub struct AddToKnowledgeBaseCommand;

#[async_trait]
impl Command for AddToKnowledgeBaseCommand {
    fn name(&self) -> &str {
        "add_to_knowledge_base"
    }

    fn description(&self) -> &str {
        "Adds a dated entry to the project's knowledge base."
    }

    async fn execute(&self, args: &CommandArgs, ctx: &mut dyn CommandContext) -> CommandOutput {
        let (Some(title), Some(content)) = (args.get("title"), args.get("content")) else {
            return CommandOutput::error("add_to_knowledge_base requires 'title' and 'content' arguments");
        };

        let mut entry = KnowledgeEntry::new(title, content, Utc::now());
        if let Some(tags) = args.get("tags") {
            entry.tags = tags.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect();
        }
        entry.source = args.get("source").cloned();
        if let Some(importance) = args.get("importance").and_then(|v| v.parse().ok()) {
            entry.importance = importance;
        }
        if let Some(confidence) = args.get("confidence").and_then(|v| v.parse().ok()) {
            entry.confidence = confidence;
        }

        ctx.research_mut().knowledge_base_mut().add_entry(entry);
        match ctx.research().persist_knowledge_base().await {
            Ok(()) => CommandOutput::text(format!("added knowledge base entry '{title}'")),
            Err(e) => CommandOutput::error(e.to_string()),
        }
    }
}

/// Appends a line to the project-wide permanent log shown in every node's header section.
pub struct AddToPermanentLogCommand;

#[async_trait]
impl Command for AddToPermanentLogCommand {
    fn name(&self) -> &str {
        "add_to_permanent_log"
    }

    fn description(&self) -> &str {
        "Adds a line to the permanent log surfaced in every node's header section."
    }

    async fn execute(&self, args: &CommandArgs, ctx: &mut dyn CommandContext) -> CommandOutput {
        let Some(content) = args.get("content") else {
            return CommandOutput::error("add_to_permanent_log requires a 'content' argument");
        };
        match ctx.add_to_permanent_log(content).await {
            Ok(()) => CommandOutput::text("added to permanent log"),
            Err(e) => CommandOutput::error(e.to_string()),
        }
    }
}
