//! Per-node history store and chronological rendering for the LLM.
//!
//! Grounded on `original_source/.../history/history.py` (`commit_and_get_auto_reply`,
//! `save`/`load`) and on `engine.py`'s history-rendering loop inside `execute()`
//! (`future_changes_map` construction; newest-3-in-full, then halving-with-300-floor
//! truncation).

use crate::aggregator::AutoReplyAggregator;
use crate::blocks::{AutoReply, ChatMessage, HistoryBlock};
use dr_sections::RendererRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const FULL_DETAIL_REPLIES: usize = 3;
const INITIAL_MAX_LEN: usize = 5000;
const MIN_MAX_LEN: usize = 300;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NodeHistory {
    blocks: Vec<HistoryBlock>,
    auto_reply_aggregator: AutoReplyAggregator,
    initial_interface_content: Option<String>,
}

/// One message ready to hand to the LLM request builder, in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    pub author: String,
    pub content: String,
}

impl NodeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_message(&mut self, author: impl Into<String>, content: impl Into<String>) {
        self.blocks.push(HistoryBlock::ChatMessage(ChatMessage {
            author: author.into(),
            content: content.into(),
        }));
    }

    pub fn aggregator_mut(&mut self) -> &mut AutoReplyAggregator {
        &mut self.auto_reply_aggregator
    }

    pub fn aggregator(&self) -> &AutoReplyAggregator {
        &self.auto_reply_aggregator
    }

    pub fn blocks(&self) -> &[HistoryBlock] {
        &self.blocks
    }

    pub fn set_initial_interface_content(&mut self, content: impl Into<String>) {
        self.initial_interface_content = Some(content.into());
    }

    pub fn initial_interface_content(&self) -> Option<&str> {
        self.initial_interface_content.as_deref()
    }

    /// If the aggregator has nothing pending, returns `None` and leaves history untouched.
    /// Otherwise compiles an `AutoReply`, appends it to the block list, and returns a copy.
    pub fn commit_and_get_auto_reply(&mut self) -> Option<AutoReply> {
        if self.auto_reply_aggregator.is_empty() {
            return None;
        }
        let reply = self.auto_reply_aggregator.compile_and_clear();
        self.blocks.push(HistoryBlock::AutoReply(reply.clone()));
        Some(reply)
    }

    /// Renders the full block list into chronological LLM-facing messages, applying the
    /// look-ahead staleness map and the auto-reply truncation budget described in §4.3.
    pub fn render_history(&self, registry: &RendererRegistry) -> Vec<RenderedMessage> {
        let blocks = &self.blocks;
        let n = blocks.len();
        let mut newest_first = Vec::with_capacity(n);
        let mut auto_reply_counter = 0usize;
        let mut current_max_len = INITIAL_MAX_LEN;

        for i in (0..n).rev() {
            match &blocks[i] {
                HistoryBlock::ChatMessage(msg) => {
                    newest_first.push(RenderedMessage {
                        author: msg.author.clone(),
                        content: msg.content.clone(),
                    });
                }
                HistoryBlock::AutoReply(reply) => {
                    let future_changes_map = build_future_changes_map(blocks, i, reply);
                    auto_reply_counter += 1;
                    let max_len = if auto_reply_counter <= FULL_DETAIL_REPLIES {
                        None
                    } else {
                        let this_max = current_max_len;
                        current_max_len = (current_max_len / 2).max(MIN_MAX_LEN);
                        Some(this_max)
                    };
                    let content = render_auto_reply(reply, registry, &future_changes_map, max_len);
                    newest_first.push(RenderedMessage {
                        author: "user".to_string(),
                        content,
                    });
                }
            }
        }
        newest_first.reverse();
        newest_first
    }
}

/// For each section index this historical `AutoReply` reports, counts how many *later*
/// `AutoReply` blocks (index strictly greater than `at`) also report that same index.
fn build_future_changes_map(
    blocks: &[HistoryBlock],
    at: usize,
    reply: &AutoReply,
) -> HashMap<usize, usize> {
    let mut map = HashMap::new();
    for (section_index, _) in &reply.dynamic_sections {
        let mut count = 0;
        for later in &blocks[at + 1..] {
            if let HistoryBlock::AutoReply(later_reply) = later {
                if later_reply
                    .dynamic_sections
                    .iter()
                    .any(|(idx, _)| idx == section_index)
                {
                    count += 1;
                }
            }
        }
        map.insert(*section_index, count);
    }
    map
}

fn render_auto_reply(
    reply: &AutoReply,
    registry: &RendererRegistry,
    future_changes_map: &HashMap<usize, usize>,
    max_len: Option<usize>,
) -> String {
    let mut parts = Vec::new();

    if let Some(report) = &reply.error_report {
        parts.push(report.clone());
    }

    if !reply.command_outputs.is_empty() {
        let mut out = String::from("### Command Outputs:\n");
        for (name, value) in &reply.command_outputs {
            let rendered = serde_json::to_string_pretty(value)
                .unwrap_or_else(|_| value.to_string());
            let rendered = truncate(&rendered, max_len);
            out.push_str(&format!("- {name}: {rendered}\n"));
        }
        parts.push(out);
    }

    if !reply.internal_messages.is_empty() {
        let mut out = String::from("### Internal Messages:\n");
        for (author, content) in &reply.internal_messages {
            out.push_str(&format!("[{author}] {content}\n"));
        }
        parts.push(out);
    }

    if let Some(confirmation) = &reply.confirmation_request {
        parts.push(confirmation.clone());
    }

    for (section_index, data) in &reply.dynamic_sections {
        let future_changes = future_changes_map.get(section_index).copied().unwrap_or(0);
        parts.push(registry.render(data, future_changes));
    }

    parts.join("\n\n")
}

fn truncate(text: &str, max_len: Option<usize>) -> String {
    match max_len {
        Some(limit) if text.len() > limit => {
            format!("{}...\n[truncated, {} total chars]", &text[..limit], text.len())
        }
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dr_sections::builtin::default_registry;
    use dr_sections::data::{BudgetSectionData, DynamicSectionData};

    fn reply_with_section(index: usize, remaining: u32) -> AutoReply {
        AutoReply {
            error_report: None,
            command_outputs: vec![],
            internal_messages: vec![],
            confirmation_request: None,
            dynamic_sections: vec![(
                index,
                DynamicSectionData::Budget(BudgetSectionData {
                    budget: Some(10),
                    remaining_budget: Some(remaining),
                }),
            )],
        }
    }

    #[test]
    fn commit_returns_none_when_aggregator_is_empty() {
        let mut history = NodeHistory::new();
        assert!(history.commit_and_get_auto_reply().is_none());
        assert!(history.blocks().is_empty());
    }

    #[test]
    fn commit_appends_block_when_aggregator_has_pending_feedback() {
        let mut history = NodeHistory::new();
        history.aggregator_mut().add_error_report("something failed");
        let reply = history.commit_and_get_auto_reply().unwrap();
        assert_eq!(reply.error_report.as_deref(), Some("something failed"));
        assert_eq!(history.blocks().len(), 1);
    }

    #[test]
    fn render_history_is_chronological_and_reverses_newest_first_walk() {
        let mut history = NodeHistory::new();
        history.add_message("assistant", "first");
        history.add_message("assistant", "second");
        let registry = default_registry();
        let rendered = history.render_history(&registry);
        assert_eq!(rendered[0].content, "first");
        assert_eq!(rendered[1].content, "second");
    }

    #[test]
    fn future_changes_map_counts_later_reports_of_same_section() {
        let mut history = NodeHistory::new();
        history.blocks.push(HistoryBlock::AutoReply(reply_with_section(3, 10)));
        history.blocks.push(HistoryBlock::AutoReply(reply_with_section(3, 9)));
        history.blocks.push(HistoryBlock::AutoReply(reply_with_section(3, 8)));
        let map = build_future_changes_map(&history.blocks, 0, &reply_with_section(3, 10));
        assert_eq!(map.get(&3), Some(&2));
        let map_last = build_future_changes_map(&history.blocks, 2, &reply_with_section(3, 8));
        assert_eq!(map_last.get(&3), Some(&0));
    }

    #[test]
    fn auto_reply_truncation_budget_halves_after_third_reply() {
        let mut history = NodeHistory::new();
        let big_value = serde_json::json!("x".repeat(6000));
        for i in 0..5 {
            history
                .aggregator_mut()
                .add_command_output(format!("cmd{i}"), big_value.clone());
            history.commit_and_get_auto_reply();
        }
        let registry = default_registry();
        let rendered = history.render_history(&registry);
        // Newest 3 (indices 2,3,4 chronologically → but truncation counts from newest) stay
        // untruncated; oldest two get progressively smaller caps.
        assert_eq!(rendered.len(), 5);
        assert!(rendered[4].content.len() > 6000); // newest: full detail
        assert!(rendered[1].content.contains("[truncated"));
        assert!(rendered[0].content.contains("[truncated"));
    }
}
