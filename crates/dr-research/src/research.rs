//! Top-level research project: tree + knowledge base + permanent log + persistence driver.
//!
//! Grounded on `original_source/.../research/research.py`'s `ResearchImpl`, which owns the
//! same four pieces and exposes `initiate_research`/`research_already_exists`. The root-level
//! legacy `artifacts/`/`logs/` directories that `ResearchImpl.initiate_research` also creates
//! are dead scaffolding from an earlier layout revision (nothing in the source ever reads from
//! them) and are deliberately not reproduced here — see SPEC_FULL.md §9.

use crate::error::{Error, Result};
use crate::knowledge_base::KnowledgeBase;
use crate::permanent_log::PermanentLog;
use crate::persist::{PersistenceDriver, ResearchMetadata};
use crate::tree::ResearchTree;
use chrono::Utc;
use dr_core::NodeId;

pub struct Research {
    tree: ResearchTree,
    knowledge_base: KnowledgeBase,
    permanent_log: PermanentLog,
    driver: Box<dyn PersistenceDriver>,
}

impl Research {
    pub fn new(driver: Box<dyn PersistenceDriver>) -> Self {
        Self { tree: ResearchTree::new(), knowledge_base: KnowledgeBase::new(), permanent_log: PermanentLog::new(), driver }
    }

    pub fn is_initiated(&self) -> bool {
        !self.tree.is_empty()
    }

    pub fn research_already_exists(&self) -> bool {
        self.driver.research_already_exists()
    }

    pub fn tree(&self) -> &ResearchTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ResearchTree {
        &mut self.tree
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    pub fn knowledge_base_mut(&mut self) -> &mut KnowledgeBase {
        &mut self.knowledge_base
    }

    pub fn permanent_log(&self) -> &PermanentLog {
        &self.permanent_log
    }

    pub fn permanent_log_mut(&mut self) -> &mut PermanentLog {
        &mut self.permanent_log
    }

    /// Creates the root node and writes `research_metadata.json`. Fails if a root already
    /// exists in memory (`define_problem` is a once-per-run operation, §4.2).
    pub async fn initiate_research(&mut self, title: impl Into<String>, problem_definition: impl Into<String>) -> Result<NodeId> {
        let title = title.into();
        let root = self.tree.add_root(title.clone(), problem_definition)?;
        self.tree.get_mut(root)?.path = Some(self.driver.node_dir(&[title.clone()]));

        let now = Utc::now();
        self.driver
            .write_research_metadata(&ResearchMetadata { created_at: now, last_updated: now, root_node_title: title })
            .await?;
        self.persist_node(root).await?;
        Ok(root)
    }

    /// Assigns a directory (derived from the node's ancestor-title chain) to a freshly
    /// created child and persists it.
    pub async fn finalize_new_child(&mut self, id: NodeId) -> Result<()> {
        let segments: Vec<String> = self
            .tree
            .path_from_root(id)
            .into_iter()
            .map(|ancestor| self.tree.get(ancestor).map(|n| n.title.clone()))
            .collect::<Result<_>>()?;
        self.tree.get_mut(id)?.path = Some(self.driver.node_dir(&segments));
        self.persist_node(id).await
    }

    pub async fn persist_node(&self, id: NodeId) -> Result<()> {
        self.driver.write_node(self.tree.get(id)?).await
    }

    pub async fn persist_knowledge_base(&self) -> Result<()> {
        self.driver.write_knowledge_base(&self.knowledge_base).await
    }

    pub async fn persist_permanent_log(&self) -> Result<()> {
        self.driver.write_permanent_log(&self.permanent_log).await
    }

    pub async fn record_llm_exchange(&self, id: NodeId, request_text: &str, response_text: &str) -> Result<()> {
        let node = self.tree.get(id)?;
        self.driver.write_llm_exchange(node, Utc::now(), request_text, response_text).await
    }

    pub async fn load_knowledge_base(&mut self) -> Result<()> {
        self.knowledge_base = self.driver.read_knowledge_base().await?;
        Ok(())
    }

    pub async fn load_permanent_log(&mut self) -> Result<()> {
        self.permanent_log = self.driver.read_permanent_log().await?;
        Ok(())
    }

    pub async fn add_to_knowledge_base(&mut self, title: impl Into<String>, content: impl Into<String>) -> Result<()> {
        use crate::knowledge_base::KnowledgeEntry;
        self.knowledge_base.add_entry(KnowledgeEntry::new(title, content, Utc::now()));
        self.persist_knowledge_base().await
    }

    pub async fn add_to_permanent_log(&mut self, content: impl Into<String>) -> Result<()> {
        self.permanent_log.append(content, Utc::now());
        self.persist_permanent_log().await
    }

    /// Persists an artifact into `_ExternalFiles/` in addition to its owning node's directory,
    /// if flagged external (§6).
    pub async fn mirror_external_artifact(&self, id: NodeId) -> Result<()> {
        let node = self.tree.get(id)?;
        for artifact in node.artifacts.iter().filter(|a| a.is_external) {
            let doc = crate::frontmatter::write(
                &[("name", artifact.name.clone()), ("summary", artifact.short_summary.clone()), ("is_external", "true".to_string())],
                &artifact.content,
            );
            self.driver.write_external_artifact(&artifact.name, &doc).await?;
        }
        Ok(())
    }

    pub fn root_title(&self) -> Result<&str> {
        if self.tree.is_empty() {
            return Err(Error::RootNotDefined);
        }
        Ok(self.tree.get(self.tree.root())?.title.as_str())
    }
}
