//! Command pipeline: turns parsed text into executed commands plus auto-reply feedback.
//!
//! Grounded on `original_source/.../engine/engine.py`'s `_CommandProcessor`
//! (`_execute_commands`, `_execute_single_command`, `_generate_final_report`). Parse errors are
//! reported and the offending invocation skipped, never executed (§7 "Parse error"). A command
//! other than the last one flagged `must_be_last` is a validation error, not a handler failure.

use crate::command::{CommandArgs, CommandContext, CommandOutput};
use crate::parser::CommandParser;
use crate::registry::CommandRegistry;

#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    /// Text to surface to the operator/LLM describing parse and validation failures, in
    /// addition to whatever the context's `add_error_report` already queued.
    pub error_report: Option<String>,
    pub executed: Vec<(String, CommandOutput)>,
}

pub struct CommandPipeline<'a> {
    parser: &'a dyn CommandParser,
    registry: &'a CommandRegistry,
}

impl<'a> CommandPipeline<'a> {
    pub fn new(parser: &'a dyn CommandParser, registry: &'a CommandRegistry) -> Self {
        Self { parser, registry }
    }

    /// Parses `text`, executes every well-formed command in order, and returns a summary.
    /// Once a `must_be_last` command has executed, any further invocations in the same batch
    /// are reported as a validation error and skipped — the pipeline never runs code past it.
    pub async fn process(&self, text: &str, ctx: &mut dyn CommandContext) -> PipelineReport {
        let results = self.parser.parse_text(text);
        let failed: Vec<_> = results.iter().filter(|r| !r.is_ok()).cloned().collect();
        let error_report = if failed.is_empty() { None } else { Some(self.parser.generate_error_report(&failed)) };

        let mut executed = Vec::new();
        let mut terminated = false;
        let mut any_error = !failed.is_empty();

        for result in results.into_iter().filter(|r| r.is_ok()) {
            if terminated {
                let message = format!("command '{}' skipped: came after a command that has to be the last in the message", result.command_name);
                tracing::warn!(command = %result.command_name, "command skipped after terminal command");
                ctx.add_error_report(&message);
                executed.push((result.command_name, CommandOutput::error(message)));
                continue;
            }

            if any_error && matches!(result.command_name.as_str(), "finish_problem" | "fail_problem") {
                let message = "skipped: other errors detected in the message, do you really want to go ahead?".to_string();
                tracing::warn!(command = %result.command_name, "finish/fail skipped pending confirmation");
                ctx.add_confirmation_request(
                    "You attempted to finish or fail the current problem, but other errors were \
                     reported earlier in this message. Re-issue the command alone if you still \
                     want to go ahead.",
                );
                executed.push((result.command_name, CommandOutput::error(message)));
                continue;
            }

            let output = self.execute_one(&result.command_name, &result.args, ctx).await;
            if output.is_error() {
                any_error = true;
            }
            if let Some(command) = self.registry.get(&result.command_name) {
                if command.must_be_last() && !output.is_error() {
                    terminated = true;
                }
            }
            executed.push((result.command_name, output));
        }

        PipelineReport { error_report, executed }
    }

    async fn execute_one(&self, name: &str, args: &CommandArgs, ctx: &mut dyn CommandContext) -> CommandOutput {
        match self.registry.get(name) {
            Some(command) => {
                let output = command.execute(args, ctx).await;
                if let CommandOutput::Error(message) = &output {
                    tracing::error!(command = name, error = %message, "command handler reported failure");
                }
                ctx.add_command_output(name, output.clone().into_json());
                output
            }
            None => {
                let message = format!("Command '{name}' not found in registry.");
                ctx.add_error_report(&message);
                CommandOutput::error(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::parser::LineCommandParser;
    use async_trait::async_trait;
    use dr_core::NodeId;
    use dr_research::{LocalFsDriver, Research};

    struct EchoCommand;

    #[async_trait]
    impl Command for EchoCommand {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "echoes its 'text' argument"
        }
        async fn execute(&self, args: &CommandArgs, _ctx: &mut dyn CommandContext) -> CommandOutput {
            CommandOutput::text(args.get("text").cloned().unwrap_or_default())
        }
    }

    struct FinishCommand;

    #[async_trait]
    impl Command for FinishCommand {
        fn name(&self) -> &str {
            "finish_problem"
        }
        fn description(&self) -> &str {
            "ends the turn"
        }
        fn must_be_last(&self) -> bool {
            true
        }
        async fn execute(&self, _args: &CommandArgs, _ctx: &mut dyn CommandContext) -> CommandOutput {
            CommandOutput::text("finished")
        }
    }

    struct FakeContext {
        research: Research,
        errors: Vec<String>,
        outputs: Vec<(String, serde_json::Value)>,
    }

    impl FakeContext {
        fn new(tmp: &std::path::Path) -> Self {
            Self { research: Research::new(Box::new(LocalFsDriver::new(tmp))), errors: Vec::new(), outputs: Vec::new() }
        }
    }

    #[async_trait]
    impl CommandContext for FakeContext {
        fn current_node(&self) -> NodeId {
            NodeId::ROOT
        }
        fn research(&self) -> &Research {
            &self.research
        }
        fn research_mut(&mut self) -> &mut Research {
            &mut self.research
        }
        async fn focus_down(&mut self, _child_title: &str) -> crate::error::Result<()> {
            Ok(())
        }
        async fn add_subproblem(&mut self, _title: &str, _problem_definition: &str) -> crate::error::Result<()> {
            Ok(())
        }
        async fn focus_up(&mut self) -> crate::error::Result<()> {
            Ok(())
        }
        async fn fail_and_focus_up(&mut self, _reason: &str) -> crate::error::Result<()> {
            Ok(())
        }
        fn add_command_output(&mut self, command_name: &str, output: serde_json::Value) {
            self.outputs.push((command_name.to_string(), output));
        }
        fn add_error_report(&mut self, report: &str) {
            self.errors.push(report.to_string());
        }
        fn add_confirmation_request(&mut self, _text: &str) {}
        async fn add_to_permanent_log(&mut self, _content: &str) -> crate::error::Result<()> {
            Ok(())
        }
        async fn add_to_knowledge_base(&mut self, _title: &str, _content: &str) -> crate::error::Result<()> {
            Ok(())
        }
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register(EchoCommand);
        registry.register(FinishCommand);
        registry
    }

    #[tokio::test]
    async fn executes_well_formed_commands_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let mut ctx = FakeContext::new(tmp.path());
        let registry = registry();
        let parser = LineCommandParser;
        let pipeline = CommandPipeline::new(&parser, &registry);

        let report = pipeline.process(r#"echo text="hi""#, &mut ctx).await;
        assert!(report.error_report.is_none());
        assert_eq!(report.executed.len(), 1);
        assert!(matches!(&report.executed[0].1, CommandOutput::Text(s) if s == "hi"));
    }

    #[tokio::test]
    async fn commands_after_a_must_be_last_command_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let mut ctx = FakeContext::new(tmp.path());
        let registry = registry();
        let parser = LineCommandParser;
        let pipeline = CommandPipeline::new(&parser, &registry);

        let report = pipeline.process("finish_problem\necho text=\"too_late\"", &mut ctx).await;
        assert_eq!(report.executed.len(), 2);
        assert!(matches!(&report.executed[0].1, CommandOutput::Text(s) if s == "finished"));
        assert!(matches!(
            &report.executed[1].1,
            CommandOutput::Error(s) if s == "command 'echo' skipped: came after a command that has to be the last in the message"
        ));
    }

    #[tokio::test]
    async fn finish_problem_skipped_after_prior_error_and_appends_confirmation() {
        let tmp = tempfile::tempdir().unwrap();
        let mut ctx = FakeContext::new(tmp.path());
        let registry = registry();
        let parser = LineCommandParser;
        let pipeline = CommandPipeline::new(&parser, &registry);

        let report = pipeline.process("not_a_real_command\nfinish_problem", &mut ctx).await;
        assert_eq!(report.executed.len(), 2);
        assert!(report.executed[0].1.is_error());
        assert!(report.executed[1].1.is_error());
        assert!(matches!(&report.executed[1].1, CommandOutput::Error(s) if s.contains("do you really want to go ahead")));
    }

    #[tokio::test]
    async fn unknown_command_reports_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut ctx = FakeContext::new(tmp.path());
        let registry = registry();
        let parser = LineCommandParser;
        let pipeline = CommandPipeline::new(&parser, &registry);

        let report = pipeline.process("not_a_real_command", &mut ctx).await;
        assert_eq!(report.executed.len(), 1);
        assert!(matches!(
            &report.executed[0].1,
            CommandOutput::Error(s) if s == "Command 'not_a_real_command' not found in registry."
        ));
        assert_eq!(ctx.errors.len(), 1);
        assert_eq!(ctx.errors[0], "Command 'not_a_real_command' not found in registry.");
    }
}
