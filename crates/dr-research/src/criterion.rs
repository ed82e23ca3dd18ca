//! Success criteria: a text predicate plus a completion flag.
//!
//! Grounded on `original_source/.../research_node_component/criteria.py`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub content: String,
    pub is_completed: bool,
}

impl Criterion {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_completed: false,
        }
    }

    pub fn complete(&mut self) {
        self.is_completed = true;
    }

    pub fn uncomplete(&mut self) {
        self.is_completed = false;
    }
}
