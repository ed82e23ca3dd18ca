//! Configuration loading for the deep research engine, following the teacher's
//! nested-`#[serde(default)]` config-file convention (`agenticlaw-core::openclaw_config`).

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level engine configuration, loaded from a JSON file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub llm: LlmSettings,
    pub research: ResearchDefaults,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: String,
    pub model: String,
    #[serde(rename = "baseUrl")]
    pub base_url: Option<String>,
    #[serde(rename = "maxTokens")]
    pub max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-opus-4-6-20250929".to_string(),
            base_url: None,
            max_tokens: 8192,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResearchDefaults {
    pub workspace: String,
    /// Total message-cycle budget applied to new runs unless overridden. `None` means
    /// unbudgeted (the engine never escalates to the operator).
    pub budget: Option<u32>,
}

impl Default for ResearchDefaults {
    fn default() -> Self {
        Self {
            workspace: "./research".to_string(),
            budget: None,
        }
    }
}

impl EngineConfig {
    /// Load from `path`, falling back to defaults on any read/parse error — matches the
    /// teacher's `OpenclawConfig::load`, which treats a missing/malformed config file as
    /// "use defaults" rather than a hard failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Discover and load the config at [`Self::default_path`], or defaults if absent.
    pub fn discover() -> Self {
        Self::load(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".deep-research")
            .join("config.json")
    }

    pub fn workspace(&self) -> PathBuf {
        expand_tilde(&self.research.workspace)
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
