//! Command registry.
//!
//! Grounded on `agenticlaw-tools/src/registry.rs`'s `ToolRegistry`
//! (`HashMap<String, Arc<dyn Tool>>`, `register`/`get`/`list`).

use crate::command::Command;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: impl Command + 'static) {
        let name = command.name().to_string();
        self.commands.insert(name, Arc::new(command));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).cloned()
    }

    pub fn list(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }
}
