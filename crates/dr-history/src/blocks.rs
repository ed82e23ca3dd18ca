//! History block types.
//!
//! Grounded on `original_source/.../history/history.py`'s `_serialize_blocks`/
//! `_deserialize_blocks` (block shape) and `autoreply_aggregator.py`'s `AutoReply` field set.
//! Command-output payloads use `serde_json::Value` rather than the source's `jsonpickle`
//! general-object pickler — every built-in command handler already returns JSON-shaped data,
//! so this is a strict narrowing (see SPEC_FULL.md §9).

use dr_sections::DynamicSectionData;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub author: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AutoReply {
    pub error_report: Option<String>,
    pub command_outputs: Vec<(String, serde_json::Value)>,
    pub internal_messages: Vec<(String, String)>,
    pub confirmation_request: Option<String>,
    /// Sections that changed since the previous auto-reply, tagged by their canonical index.
    pub dynamic_sections: Vec<(usize, DynamicSectionData)>,
}

impl AutoReply {
    /// True iff none of the constituent fields carry anything — an empty `AutoReply` is never
    /// appended to history (invariant, §3).
    pub fn is_empty(&self) -> bool {
        self.error_report.is_none()
            && self.command_outputs.is_empty()
            && self.internal_messages.is_empty()
            && self.confirmation_request.is_none()
            && self.dynamic_sections.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HistoryBlock {
    ChatMessage(ChatMessage),
    AutoReply(AutoReply),
}
