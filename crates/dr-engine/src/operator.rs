//! Operator-prompt abstraction: the three suspension points where the engine loop needs a
//! human decision (LLM retry, budget extension) are routed through this trait instead of
//! blocking on stdin directly, so tests can inject scripted responses (§9 Design Note).
//!
//! Grounded on `original_source/.../engine/engine.py`'s blocking `input(...)` calls for budget
//! extension and LLM-retry confirmation.

use async_trait::async_trait;

/// A yes/no decision the engine needs from the operator before it can proceed.
#[async_trait]
pub trait OperatorPrompt: Send + Sync {
    /// An LLM call failed; ask whether to retry it.
    async fn confirm_retry(&self, error: &str) -> bool;

    /// The budget was reached a second time; ask whether to grant another extension.
    async fn confirm_budget_extension(&self, cycles_used: u32, budget: u32) -> bool;
}

/// Always answers with a fixed yes/no, or from a pre-scripted sequence — for tests that need
/// deterministic operator behavior without a real terminal.
#[derive(Debug, Default)]
pub struct ScriptedOperatorPrompt {
    retry_answers: std::sync::Mutex<std::collections::VecDeque<bool>>,
    extension_answers: std::sync::Mutex<std::collections::VecDeque<bool>>,
}

impl ScriptedOperatorPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retry_answers(answers: impl IntoIterator<Item = bool>) -> Self {
        Self { retry_answers: std::sync::Mutex::new(answers.into_iter().collect()), extension_answers: Default::default() }
    }

    pub fn with_extension_answers(answers: impl IntoIterator<Item = bool>) -> Self {
        Self { retry_answers: Default::default(), extension_answers: std::sync::Mutex::new(answers.into_iter().collect()) }
    }
}

#[async_trait]
impl OperatorPrompt for ScriptedOperatorPrompt {
    async fn confirm_retry(&self, _error: &str) -> bool {
        self.retry_answers.lock().unwrap().pop_front().unwrap_or(false)
    }

    async fn confirm_budget_extension(&self, _cycles_used: u32, _budget: u32) -> bool {
        self.extension_answers.lock().unwrap().pop_front().unwrap_or(false)
    }
}

/// Prompts the operator on stdin/stderr for a yes/no answer — the production implementation
/// used by the CLI binary.
#[derive(Debug, Default)]
pub struct StdinOperatorPrompt;

impl StdinOperatorPrompt {
    pub fn new() -> Self {
        Self
    }

    async fn ask(&self, prompt: &str) -> bool {
        use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
        let mut stderr = tokio::io::stderr();
        let _ = stderr.write_all(format!("{prompt} [y/N] ").as_bytes()).await;
        let _ = stderr.flush().await;
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        match lines.next_line().await {
            Ok(Some(line)) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }
}

#[async_trait]
impl OperatorPrompt for StdinOperatorPrompt {
    async fn confirm_retry(&self, error: &str) -> bool {
        self.ask(&format!("LLM request failed ({error}). Retry?")).await
    }

    async fn confirm_budget_extension(&self, cycles_used: u32, budget: u32) -> bool {
        self.ask(&format!("Cycle budget of {budget} exhausted ({cycles_used} used). Grant a 20-cycle extension?")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_prompt_defaults_to_decline() {
        let prompt = ScriptedOperatorPrompt::new();
        assert!(!prompt.confirm_retry("boom").await);
        assert!(!prompt.confirm_budget_extension(10, 10).await);
    }

    #[tokio::test]
    async fn scripted_prompt_replays_answers_in_order() {
        let prompt = ScriptedOperatorPrompt::with_retry_answers([true, false]);
        assert!(prompt.confirm_retry("first").await);
        assert!(!prompt.confirm_retry("second").await);
        assert!(!prompt.confirm_retry("third").await);
    }
}
