//! The engine crate: focus scheduling, budget control, section snapshotting, and the main
//! per-instruction turn loop that drives a [`dr_research::Research`] tree through an
//! [`dr_llm::LlmProvider`] and a [`dr_commands::CommandPipeline`].

pub mod budget;
pub mod command_context;
pub mod engine;
pub mod operator;
pub mod scheduler;
pub mod sections;
pub mod state;

pub use budget::BudgetController;
pub use command_context::EngineCommandContext;
pub use engine::{Engine, EngineOutcome};
pub use operator::{OperatorPrompt, ScriptedOperatorPrompt, StdinOperatorPrompt};
pub use scheduler::FocusScheduler;
pub use state::{ChildrenQueue, ExecutionState};
