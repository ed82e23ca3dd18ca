//! Shared types, error taxonomy, and configuration for the deep research engine.

pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use types::*;
