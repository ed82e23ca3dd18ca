//! LLM provider adapters — a streaming `LlmProvider` trait plus an Anthropic implementation,
//! used by the engine to generate each turn's assistant text.

pub mod anthropic;
pub mod provider;
pub mod types;

pub use anthropic::AnthropicProvider;
pub use provider::LlmProvider;
pub use types::*;
