//! Persistence driver: maps nodes and project-wide state onto the on-disk layout (§6).
//!
//! Grounded on `agenticlaw-kg::resource`'s pluggable `ResourceDriver`/`LocalFsDriver` split,
//! adapted from the KG executor's abstract graph addresses to this engine's concrete
//! per-node directory layout. `_ExternalFiles/` folds the source's separate external-files
//! manager into a plain write call on this same driver, since nothing else ever reads that
//! directory back in at runtime (§6 lists it as an output-only mirror of external artifacts).

use crate::error::{Error, Result};
use crate::frontmatter;
use crate::knowledge_base::KnowledgeBase;
use crate::permanent_log::PermanentLog;
use crate::tree::ResearchNode;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchMetadata {
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub root_node_title: String,
}

fn sanitize_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' || c == ' ' { c } else { '_' })
        .collect()
}

#[async_trait]
pub trait PersistenceDriver: Send + Sync {
    async fn write_node(&self, node: &ResearchNode) -> Result<()>;
    async fn write_llm_exchange(
        &self,
        node: &ResearchNode,
        timestamp: DateTime<Utc>,
        request_text: &str,
        response_text: &str,
    ) -> Result<()>;
    async fn write_research_metadata(&self, metadata: &ResearchMetadata) -> Result<()>;
    async fn read_research_metadata(&self) -> Result<Option<ResearchMetadata>>;
    async fn write_knowledge_base(&self, kb: &KnowledgeBase) -> Result<()>;
    async fn read_knowledge_base(&self) -> Result<KnowledgeBase>;
    async fn write_permanent_log(&self, log: &PermanentLog) -> Result<()>;
    async fn read_permanent_log(&self) -> Result<PermanentLog>;
    async fn write_external_artifact(&self, name: &str, frontmatter_doc: &str) -> Result<()>;
    fn node_dir(&self, segments: &[String]) -> PathBuf;
    fn root_dir(&self) -> &Path;
    fn research_already_exists(&self) -> bool;
}

/// Writes the on-disk research tree under a single root directory.
pub struct LocalFsDriver {
    root_dir: PathBuf,
}

impl LocalFsDriver {
    pub fn new(root_dir: impl AsRef<Path>) -> Self {
        Self { root_dir: root_dir.as_ref().to_path_buf() }
    }

    fn metadata_path(&self) -> PathBuf {
        self.root_dir.join("research_metadata.json")
    }

    fn knowledge_base_path(&self) -> PathBuf {
        self.root_dir.join("_knowledge_base.md")
    }

    fn permanent_log_path(&self) -> PathBuf {
        self.root_dir.join("permanent_log.json")
    }

    fn external_files_dir(&self) -> PathBuf {
        self.root_dir.join("_ExternalFiles")
    }
}

#[async_trait]
impl PersistenceDriver for LocalFsDriver {
    async fn write_node(&self, node: &ResearchNode) -> Result<()> {
        let dir = node.path.as_ref().ok_or_else(|| Error::Core(dr_core::Error::internal("node has no assigned directory")))?;
        fs::create_dir_all(dir).await?;

        let problem_def = frontmatter::write(&[("status", node.status().to_string())], &node.problem_definition);
        fs::write(dir.join("Problem Definition.md"), problem_def).await?;

        let artifacts_dir = dir.join("Artifacts");
        fs::create_dir_all(&artifacts_dir).await?;
        for artifact in &node.artifacts {
            let mut fields = vec![("name", artifact.name.clone()), ("summary", artifact.short_summary.clone())];
            if artifact.is_external {
                fields.push(("is_external", "true".to_string()));
            }
            let doc = frontmatter::write(&fields, &artifact.content);
            let filename = format!("{}.md", sanitize_segment(&artifact.name));
            fs::write(artifacts_dir.join(filename), doc).await?;
        }

        let state_json = serde_json::to_vec_pretty(&node.state)?;
        fs::write(dir.join("node_state.json"), state_json).await?;

        let history_json = serde_json::to_vec_pretty(&node.history)?;
        fs::write(dir.join("history.json"), history_json).await?;

        tracing::debug!(node = %node.title, dir = %dir.display(), "persisted node");
        Ok(())
    }

    async fn write_llm_exchange(
        &self,
        node: &ResearchNode,
        timestamp: DateTime<Utc>,
        request_text: &str,
        response_text: &str,
    ) -> Result<()> {
        let dir = node.path.as_ref().ok_or_else(|| Error::Core(dr_core::Error::internal("node has no assigned directory")))?;
        let logs_dir = dir.join("logs_and_debug");
        fs::create_dir_all(&logs_dir).await?;
        let stamp = timestamp.format("%Y%m%dT%H%M%S%.3fZ");
        fs::write(logs_dir.join(format!("{stamp}_LLM_Request.md")), request_text).await?;
        fs::write(logs_dir.join(format!("{stamp}_LLM_Response.md")), response_text).await?;
        Ok(())
    }

    async fn write_research_metadata(&self, metadata: &ResearchMetadata) -> Result<()> {
        fs::create_dir_all(&self.root_dir).await?;
        fs::write(self.metadata_path(), serde_json::to_vec_pretty(metadata)?).await?;
        Ok(())
    }

    async fn read_research_metadata(&self) -> Result<Option<ResearchMetadata>> {
        match fs::read(self.metadata_path()).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_knowledge_base(&self, kb: &KnowledgeBase) -> Result<()> {
        fs::create_dir_all(&self.root_dir).await?;
        fs::write(self.knowledge_base_path(), kb.to_file_string()).await?;
        Ok(())
    }

    async fn read_knowledge_base(&self) -> Result<KnowledgeBase> {
        match fs::read_to_string(self.knowledge_base_path()).await {
            Ok(content) => Ok(KnowledgeBase::from_file_string(&content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(KnowledgeBase::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_permanent_log(&self, log: &PermanentLog) -> Result<()> {
        fs::create_dir_all(&self.root_dir).await?;
        fs::write(self.permanent_log_path(), serde_json::to_vec_pretty(log)?).await?;
        Ok(())
    }

    async fn read_permanent_log(&self) -> Result<PermanentLog> {
        match fs::read(self.permanent_log_path()).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PermanentLog::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_external_artifact(&self, name: &str, frontmatter_doc: &str) -> Result<()> {
        let dir = self.external_files_dir();
        fs::create_dir_all(&dir).await?;
        let filename = format!("{}.md", sanitize_segment(name));
        fs::write(dir.join(filename), frontmatter_doc).await?;
        Ok(())
    }

    fn node_dir(&self, segments: &[String]) -> PathBuf {
        let mut dir = self.root_dir.clone();
        for segment in segments {
            dir = dir.join(sanitize_segment(segment));
        }
        dir
    }

    fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn research_already_exists(&self) -> bool {
        self.metadata_path().exists()
    }
}
