//! dr-research — the research tree: nodes, artifacts, criteria, knowledge base, persistence.

pub mod artifact;
pub mod criterion;
pub mod error;
pub mod frontmatter;
pub mod knowledge_base;
pub mod permanent_log;
pub mod persist;
pub mod research;
pub mod state;
pub mod tree;

pub use artifact::Artifact;
pub use criterion::Criterion;
pub use error::{Error, Result};
pub use knowledge_base::{KnowledgeBase, KnowledgeEntry};
pub use permanent_log::{PermanentLog, PermanentLogEntry};
pub use persist::{LocalFsDriver, PersistenceDriver, ResearchMetadata};
pub use research::Research;
pub use state::NodeState;
pub use tree::{ResearchNode, ResearchTree, VisibleArtifact};
