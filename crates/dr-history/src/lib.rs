//! Per-node history store: append-only history blocks plus the mutable auto-reply aggregator
//! that accumulates pending feedback for the next turn.

pub mod aggregator;
pub mod blocks;
pub mod history;

pub use aggregator::AutoReplyAggregator;
pub use blocks::{AutoReply, ChatMessage, HistoryBlock};
pub use history::{NodeHistory, RenderedMessage};
