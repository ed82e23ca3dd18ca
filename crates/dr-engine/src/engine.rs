//! The main turn loop: renders the interface, talks to the LLM, runs the command pipeline,
//! and advances focus — one turn per iteration until the run ends or awaits a new instruction.
//!
//! Grounded on `original_source/.../engine/engine.py`'s `execute()` end to end, and
//! structurally on the teacher's `agenticlaw-agent/src/runtime.rs` `run_turn`/
//! `run_turn_cancellable` (`tokio::select!` biased stream consumption, per-turn tracing).

use crate::budget::{BudgetController, BudgetOutcome};
use crate::command_context::EngineCommandContext;
use crate::operator::OperatorPrompt;
use crate::scheduler::FocusScheduler;
use crate::sections;
use crate::state::ExecutionState;
use dr_commands::{register_builtins, CommandPipeline, CommandRegistry, LineCommandParser};
use dr_core::{EngineConfig, NodeId, ProblemStatus};
use dr_llm::provider::LlmError;
use dr_llm::{LlmMessage, LlmProvider, LlmRequest, StreamDelta};
use dr_research::{PersistenceDriver, Research};
use dr_sections::RendererRegistry;
use futures::StreamExt;
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// How an instruction's run ultimately concluded.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutcome {
    /// The root node reached `Finished`, with an optional operator-facing completion message.
    Finished(Option<String>),
    /// The root node reached `Failed` (either via `fail_problem`, or because the operator
    /// declined a budget extension or an LLM retry).
    Failed(Option<String>),
}

pub struct Engine {
    research: Research,
    exec_state: ExecutionState,
    scheduler: FocusScheduler,
    budget: BudgetController,
    registry: CommandRegistry,
    parser: LineCommandParser,
    renderer_registry: RendererRegistry,
    provider: Arc<dyn LlmProvider>,
    operator: Arc<dyn OperatorPrompt>,
    cancel: CancellationToken,
    model: String,
    max_tokens: Option<u32>,
    seen_active_nodes: HashSet<NodeId>,
}

impl Engine {
    pub fn new(driver: Box<dyn PersistenceDriver>, provider: Arc<dyn LlmProvider>, operator: Arc<dyn OperatorPrompt>, config: &EngineConfig) -> Self {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);
        Self {
            research: Research::new(driver),
            exec_state: ExecutionState::new(),
            scheduler: FocusScheduler::new(),
            budget: BudgetController::new(config.research.budget),
            registry,
            parser: LineCommandParser,
            renderer_registry: dr_sections::builtin::default_registry(),
            provider,
            operator,
            cancel: CancellationToken::new(),
            model: config.llm.model.clone(),
            max_tokens: Some(config.llm.max_tokens),
            seen_active_nodes: HashSet::new(),
        }
    }

    pub fn research(&self) -> &Research {
        &self.research
    }

    /// Queues `child_title` as the next sibling to activate once `parent_title`'s current
    /// child focuses back up (§4.1 "sibling queue"). No built-in command populates this; it
    /// exists for callers orchestrating a fixed sibling order ahead of time.
    pub fn queue_child(&mut self, parent_title: &str, child_title: impl Into<String>) {
        self.scheduler.children_queue_mut().push(parent_title, child_title);
    }

    /// Seeds the root node from an operator-supplied problem statement and runs the turn loop
    /// to completion (or until it suspends awaiting a new instruction).
    pub async fn start_research(&mut self, title: &str, problem_definition: &str) -> anyhow::Result<EngineOutcome> {
        let root = self.research.initiate_research(title, problem_definition).await?;
        self.exec_state.set_active(root);
        self.exec_state.set_awaiting_new_instruction(false);
        self.run_loop().await
    }

    /// The per-turn loop described in §4.6: render interface, commit auto-reply, talk to the
    /// LLM, run commands, check budget, advance focus. Runs until the root node terminates or
    /// the run suspends awaiting operator input.
    pub async fn run_loop(&mut self) -> anyhow::Result<EngineOutcome> {
        loop {
            if self.exec_state.awaiting_new_instruction() {
                anyhow::bail!("engine is awaiting a new instruction; call start_research again");
            }
            if !self.research.is_initiated() {
                anyhow::bail!("research has not been initiated");
            }
            let active = self.exec_state.active().ok_or_else(|| anyhow::anyhow!("no active node set"))?;

            let snapshots = sections::snapshot_all(&self.research, active, &self.budget);

            if self.seen_active_nodes.insert(active) {
                let initial_view = render_static_view(&snapshots, &self.renderer_registry);
                self.research.tree_mut().get_mut(active)?.history.set_initial_interface_content(initial_view);
            }

            self.research.tree_mut().get_mut(active)?.history.aggregator_mut().update_dynamic_sections(&snapshots);
            let auto_reply = self.research.tree_mut().get_mut(active)?.history.commit_and_get_auto_reply();
            if let Some(reply) = &auto_reply {
                tracing::info!(node = %active, ?reply, "auto-reply committed for this turn");
            }

            let history_messages = self.research.tree().get(active)?.history.render_history(&self.renderer_registry);
            let system = self.research.tree().get(active)?.history.initial_interface_content().unwrap_or_default().to_string();

            let messages = history_messages.into_iter().map(|m| LlmMessage { role: m.author, content: m.content.into() }).collect();

            let request = LlmRequest { model: self.model.clone(), messages, max_tokens: self.max_tokens, temperature: None, system: Some(system) };

            let response = match self.send_with_retry(request).await? {
                Some(text) => text,
                None => {
                    self.exec_state.set_awaiting_new_instruction(true);
                    return Ok(EngineOutcome::Failed(Some("LLM request aborted after the operator declined a retry".to_string())));
                }
            };

            self.research.tree_mut().get_mut(active)?.history.add_message("assistant", response.clone());

            if self.scheduler.handle_shutdown_sentinel(&mut self.research, &mut self.exec_state, active, &response)? {
                return Ok(EngineOutcome::Finished(None));
            }

            let run_ended = {
                let mut ctx = EngineCommandContext::new(&mut self.research, active, &mut self.exec_state, &mut self.scheduler);
                let pipeline = CommandPipeline::new(&self.parser, &self.registry);
                pipeline.process(&response, &mut ctx).await;
                ctx.take_run_ended()
            };

            if let Some(message) = run_ended {
                let status = self.research.tree().get(active)?.status();
                return Ok(match status {
                    ProblemStatus::Failed => EngineOutcome::Failed(message),
                    _ => EngineOutcome::Finished(message),
                });
            }

            if let Some(outcome) = self.apply_budget_outcome(active).await? {
                return Ok(outcome);
            }

            self.exec_state.advance();
        }
    }

    async fn apply_budget_outcome(&mut self, active: NodeId) -> anyhow::Result<Option<EngineOutcome>> {
        match self.budget.increment_and_check() {
            BudgetOutcome::Continue => Ok(None),
            BudgetOutcome::ApproachingLimit { cycles_used, budget } => {
                self.research.tree_mut().get_mut(active)?.history.aggregator_mut().add_internal_message(
                    "SYSTEM",
                    format!("Approaching the cycle budget ({cycles_used}/{budget} cycles used); consider wrapping up soon."),
                );
                Ok(None)
            }
            BudgetOutcome::Reached { cycles_used, budget } => {
                self.budget.add_buffer();
                self.research.tree_mut().get_mut(active)?.history.aggregator_mut().add_internal_message(
                    "SYSTEM",
                    format!("Cycle budget of {budget} reached ({cycles_used} cycles used). You have a 10-cycle buffer to wrap up."),
                );
                Ok(None)
            }
            BudgetOutcome::NeedsExtensionDecision { cycles_used, budget } => {
                if self.operator.confirm_budget_extension(cycles_used, budget).await {
                    self.budget.extend();
                    Ok(None)
                } else {
                    self.research.tree_mut().get_mut(active)?.set_status(ProblemStatus::Failed);
                    self.exec_state.set_awaiting_new_instruction(true);
                    Ok(Some(EngineOutcome::Failed(Some(format!("cycle budget of {budget} exhausted and the operator declined an extension")))))
                }
            }
        }
    }

    /// Sends `request`, retrying through the operator prompt on transport failure. Returns
    /// `Ok(None)` if the operator declines a retry (the run is then aborted by the caller).
    async fn send_with_retry(&self, request: LlmRequest) -> anyhow::Result<Option<String>> {
        loop {
            match self.try_send(request.clone()).await {
                Ok(text) => return Ok(Some(text)),
                Err(err) => {
                    tracing::error!(error = %err, "LLM request failed");
                    if !self.operator.confirm_retry(&err.to_string()).await {
                        return Ok(None);
                    }
                }
            }
        }
    }

    async fn try_send(&self, request: LlmRequest) -> Result<String, LlmError> {
        let stream = self.provider.complete_stream(request, Some(self.cancel.clone())).await?;
        tokio::pin!(stream);
        let mut text = String::new();
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(LlmError::Cancelled),
                delta = stream.next() => {
                    match delta {
                        Some(Ok(StreamDelta::Text(t))) => text.push_str(&t),
                        Some(Ok(StreamDelta::Thinking(_))) => {}
                        Some(Ok(StreamDelta::Done { .. })) | None => break,
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return Err(e),
                    }
                }
            }
        }
        Ok(text)
    }
}

fn render_static_view(snapshots: &[dr_sections::DynamicSectionData], registry: &RendererRegistry) -> String {
    snapshots.iter().map(|s| registry.render(s, 0)).collect::<Vec<_>>().join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::ScriptedOperatorPrompt;
    use async_trait::async_trait;
    use dr_llm::provider::{LlmResult, LlmStream};
    use dr_research::LocalFsDriver;
    use std::sync::Mutex;

    struct ScriptedProvider {
        replies: Mutex<std::collections::VecDeque<String>>,
    }

    impl ScriptedProvider {
        fn new(replies: impl IntoIterator<Item = &'static str>) -> Self {
            Self { replies: Mutex::new(replies.into_iter().map(str::to_string).collect()) }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }
        fn models(&self) -> &[&str] {
            &["scripted-model"]
        }
        async fn complete_stream(&self, _request: LlmRequest, _cancel: Option<CancellationToken>) -> LlmResult<LlmStream> {
            let reply = self.replies.lock().unwrap().pop_front().unwrap_or_default();
            let stream = async_stream::stream! {
                yield Ok(StreamDelta::Text(reply));
                yield Ok(StreamDelta::Done { stop_reason: Some("end_turn".to_string()), usage: None });
            };
            Ok(Box::pin(stream))
        }
    }

    fn test_config() -> EngineConfig {
        EngineConfig::default()
    }

    #[tokio::test]
    async fn start_research_runs_until_finish_problem() {
        let tmp = tempfile::tempdir().unwrap();
        let provider: Arc<dyn LlmProvider> = Arc::new(ScriptedProvider::new(["finish_problem message=\"all done\""]));
        let operator: Arc<dyn OperatorPrompt> = Arc::new(ScriptedOperatorPrompt::new());
        let mut engine = Engine::new(Box::new(LocalFsDriver::new(tmp.path())), provider, operator, &test_config());

        let outcome = engine.start_research("Root", "investigate x").await.unwrap();
        assert_eq!(outcome, EngineOutcome::Finished(None));
    }

    #[tokio::test]
    async fn fail_problem_ends_run_as_failed() {
        let tmp = tempfile::tempdir().unwrap();
        let provider: Arc<dyn LlmProvider> = Arc::new(ScriptedProvider::new(["fail_problem message=\"couldn't do it\""]));
        let operator: Arc<dyn OperatorPrompt> = Arc::new(ScriptedOperatorPrompt::new());
        let mut engine = Engine::new(Box::new(LocalFsDriver::new(tmp.path())), provider, operator, &test_config());

        let outcome = engine.start_research("Root", "investigate x").await.unwrap();
        assert!(matches!(outcome, EngineOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn shutdown_sentinel_ends_run_from_root() {
        let tmp = tempfile::tempdir().unwrap();
        let provider: Arc<dyn LlmProvider> = Arc::new(ScriptedProvider::new(["please SHUT_DOWN_DEEP_RESEARCHER now"]));
        let operator: Arc<dyn OperatorPrompt> = Arc::new(ScriptedOperatorPrompt::new());
        let mut engine = Engine::new(Box::new(LocalFsDriver::new(tmp.path())), provider, operator, &test_config());

        let outcome = engine.start_research("Root", "investigate x").await.unwrap();
        assert_eq!(outcome, EngineOutcome::Finished(None));
    }

    #[tokio::test]
    async fn multi_turn_run_focuses_down_then_finishes() {
        let tmp = tempfile::tempdir().unwrap();
        let provider: Arc<dyn LlmProvider> = Arc::new(ScriptedProvider::new([
            "add_subproblem title=\"Child\" content=\"do a sub-thing\"",
            "finish_problem",
        ]));
        let operator: Arc<dyn OperatorPrompt> = Arc::new(ScriptedOperatorPrompt::new());
        let mut engine = Engine::new(Box::new(LocalFsDriver::new(tmp.path())), provider, operator, &test_config());

        let outcome = engine.start_research("Root", "investigate x").await.unwrap();
        assert_eq!(outcome, EngineOutcome::Finished(None));
        assert!(engine.research().tree().find_child_by_title(engine.research().tree().root(), "Child").is_some());
    }
}
