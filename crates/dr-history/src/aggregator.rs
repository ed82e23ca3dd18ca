//! Auto-reply aggregator: per-node pending feedback, flushed into one `AutoReply` block per
//! turn.
//!
//! Grounded on `original_source/.../history/autoreply_aggregator.py` — the diffing algorithm in
//! [`AutoReplyAggregator::update_dynamic_sections`] follows it line for line. The source's
//! serialize/deserialize keys disagree on the name of the last-known-state field
//! (`last_dynamic_sections_state` on write, `last_sections_state` on read); this translation
//! uses one consistent field throughout (Open Question resolution, SPEC_FULL.md §9).

use crate::blocks::AutoReply;
use dr_sections::DynamicSectionData;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutoReplyAggregator {
    error_reports: Vec<String>,
    command_outputs: Vec<(String, serde_json::Value)>,
    internal_messages: Vec<(String, String)>,
    confirmation_requests: Vec<String>,
    dynamic_sections_to_report: Vec<(usize, DynamicSectionData)>,
    last_known_state: Vec<DynamicSectionData>,
}

impl AutoReplyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error_report(&mut self, report: impl Into<String>) {
        self.error_reports.push(report.into());
    }

    pub fn add_confirmation_request(&mut self, text: impl Into<String>) {
        self.confirmation_requests.push(text.into());
    }

    pub fn add_command_output(&mut self, command_name: impl Into<String>, output: serde_json::Value) {
        self.command_outputs.push((command_name.into(), output));
    }

    pub fn add_internal_message(&mut self, author: impl Into<String>, content: impl Into<String>) {
        self.internal_messages.push((author.into(), content.into()));
    }

    pub fn last_known_state(&self) -> &[DynamicSectionData] {
        &self.last_known_state
    }

    /// Diffs `new_sections` against `last_known_state` by value equality, recording every
    /// changed index into `dynamic_sections_to_report`, then overwrites `last_known_state`
    /// with the new snapshot regardless of what changed.
    ///
    /// A length mismatch against the previous snapshot is treated as a structural warning: every
    /// index is re-reported rather than attempting a partial diff (matches the source's
    /// "Number of dynamic sections changed. Re-evaluating all." fallback).
    pub fn update_dynamic_sections(&mut self, new_sections: &[DynamicSectionData]) {
        if self.last_known_state.is_empty() {
            self.last_known_state = new_sections.to_vec();
            return;
        }
        if self.last_known_state.len() != new_sections.len() {
            tracing::warn!(
                old_len = self.last_known_state.len(),
                new_len = new_sections.len(),
                "number of dynamic sections changed; re-evaluating all"
            );
            for (index, data) in new_sections.iter().enumerate() {
                self.dynamic_sections_to_report.push((index, data.clone()));
            }
        } else {
            for (index, (old, new)) in self.last_known_state.iter().zip(new_sections).enumerate() {
                if old != new {
                    self.dynamic_sections_to_report.push((index, new.clone()));
                }
            }
        }
        self.last_known_state = new_sections.to_vec();
    }

    pub fn is_empty(&self) -> bool {
        self.error_reports.is_empty()
            && self.command_outputs.is_empty()
            && self.internal_messages.is_empty()
            && self.confirmation_requests.is_empty()
            && self.dynamic_sections_to_report.is_empty()
    }

    /// Builds an `AutoReply` from all pending fields and clears them — `last_known_state`
    /// survives the clear, since it is the diffing baseline for the *next* turn, not pending
    /// feedback for this one.
    pub fn compile_and_clear(&mut self) -> AutoReply {
        let error_report = if self.error_reports.is_empty() {
            None
        } else {
            Some(self.error_reports.join("\n"))
        };
        let confirmation_request = if self.confirmation_requests.is_empty() {
            None
        } else {
            Some(self.confirmation_requests.join("\n"))
        };
        let reply = AutoReply {
            error_report,
            command_outputs: std::mem::take(&mut self.command_outputs),
            internal_messages: std::mem::take(&mut self.internal_messages),
            confirmation_request,
            dynamic_sections: std::mem::take(&mut self.dynamic_sections_to_report),
        };
        self.error_reports.clear();
        self.confirmation_requests.clear();
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dr_sections::data::{BudgetSectionData, DynamicSectionData as D};

    fn budget(b: Option<u32>, r: Option<u32>) -> D {
        D::Budget(BudgetSectionData { budget: b, remaining_budget: r })
    }

    #[test]
    fn first_update_initializes_without_reporting() {
        let mut agg = AutoReplyAggregator::new();
        agg.update_dynamic_sections(&[budget(Some(10), Some(10))]);
        assert!(agg.is_empty());
        assert_eq!(agg.last_known_state().len(), 1);
    }

    #[test]
    fn unchanged_sections_produce_no_diff() {
        let mut agg = AutoReplyAggregator::new();
        let snapshot = vec![budget(Some(10), Some(10))];
        agg.update_dynamic_sections(&snapshot);
        agg.update_dynamic_sections(&snapshot);
        assert!(agg.is_empty());
    }

    #[test]
    fn changed_section_is_reported_by_index() {
        let mut agg = AutoReplyAggregator::new();
        agg.update_dynamic_sections(&[budget(Some(10), Some(10))]);
        agg.update_dynamic_sections(&[budget(Some(10), Some(9))]);
        let reply = agg.compile_and_clear();
        assert_eq!(reply.dynamic_sections.len(), 1);
        assert_eq!(reply.dynamic_sections[0].0, 0);
    }

    #[test]
    fn structural_length_change_re_reports_everything() {
        let mut agg = AutoReplyAggregator::new();
        agg.update_dynamic_sections(&[budget(Some(10), Some(10))]);
        agg.update_dynamic_sections(&[budget(Some(10), Some(10)), budget(None, None)]);
        let reply = agg.compile_and_clear();
        assert_eq!(reply.dynamic_sections.len(), 2);
    }

    #[test]
    fn compile_and_clear_resets_pending_but_not_last_known_state() {
        let mut agg = AutoReplyAggregator::new();
        agg.add_error_report("boom");
        assert!(!agg.is_empty());
        let reply = agg.compile_and_clear();
        assert_eq!(reply.error_report.as_deref(), Some("boom"));
        assert!(agg.is_empty());
    }

    #[test]
    fn empty_aggregator_compiles_to_empty_auto_reply() {
        let mut agg = AutoReplyAggregator::new();
        let reply = agg.compile_and_clear();
        assert!(reply.is_empty());
    }
}
