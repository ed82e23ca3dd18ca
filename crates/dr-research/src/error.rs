//! Tree-structural error taxonomy.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("root problem is not yet defined")]
    RootNotDefined,

    #[error("root problem is already defined")]
    RootAlreadyDefined,

    #[error("no child named '{0}' under the active node")]
    UnknownChild(String),

    #[error("a sibling named '{0}' already exists")]
    DuplicateSibling(String),

    #[error("node {0} does not exist")]
    NodeNotFound(dr_core::NodeId),

    #[error("an artifact named '{0}' already exists on this node")]
    DuplicateArtifact(String),

    #[error("no artifact named '{0}' on this node")]
    ArtifactNotFound(String),

    #[error("criterion index {0} is out of range")]
    CriterionIndexOutOfRange(usize),

    #[error(transparent)]
    Core(#[from] dr_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
