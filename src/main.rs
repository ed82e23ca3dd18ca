//! deep-research-engine — a hierarchical research orchestrator: a model-driven tree of
//! problems and subproblems, each turn rendered into a static interface plus an auto-reply of
//! what changed, sent to an LLM, and resolved through a small text command vocabulary.
//!
//! Usage:
//!   deep-research-engine new --title "..." --problem "..." [--workspace DIR] [--budget N]

use clap::{Parser, Subcommand};
use dr_core::EngineConfig;
use dr_engine::{Engine, EngineOutcome, StdinOperatorPrompt};
use dr_llm::AnthropicProvider;
use dr_research::LocalFsDriver;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "deep-research-engine", about = "Hierarchical research orchestrator", version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Path to the config file (default: ~/.deep-research/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new research run
    New {
        /// Root problem title
        #[arg(long)]
        title: String,
        /// Root problem statement handed to the model
        #[arg(long)]
        problem: String,
        /// Workspace directory for this run's persisted state (overrides the config default)
        #[arg(long)]
        workspace: Option<PathBuf>,
        /// Message-cycle budget for this run (overrides the config default; unset = unbudgeted)
        #[arg(long)]
        budget: Option<u32>,
        /// Model override (defaults to the config's `llm.model`)
        #[arg(long)]
        model: Option<String>,
    },
    /// Print the resolved configuration and exit
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path),
        None => EngineConfig::discover(),
    };

    match cli.command {
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&ConfigView::from(&config))?);
            Ok(())
        }
        Commands::New { title, problem, workspace, budget, model } => {
            if let Some(workspace) = workspace {
                config.research.workspace = workspace.to_string_lossy().into_owned();
            }
            if budget.is_some() {
                config.research.budget = budget;
            }
            if let Some(model) = model {
                config.llm.model = model;
            }
            run_new(&title, &problem, &config).await
        }
    }
}

async fn run_new(title: &str, problem: &str, config: &EngineConfig) -> anyhow::Result<()> {
    let workspace = config.workspace();
    std::fs::create_dir_all(&workspace)?;

    let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| anyhow::anyhow!("ANTHROPIC_API_KEY not set"))?;
    let provider = Arc::new(AnthropicProvider::new(api_key));
    let operator = Arc::new(StdinOperatorPrompt::new());
    let driver = Box::new(LocalFsDriver::new(&workspace));

    let mut engine = Engine::new(driver, provider, operator, config);
    if engine.research().research_already_exists() {
        anyhow::bail!("a research run already exists at {}; resuming is not supported, choose a fresh --workspace", workspace.display());
    }

    tracing::info!(%title, workspace = %workspace.display(), model = %config.llm.model, "starting research run");

    let outcome = engine.start_research(title, problem).await?;
    match outcome {
        EngineOutcome::Finished(message) => {
            println!("research finished.");
            if let Some(message) = message {
                println!("{message}");
            }
        }
        EngineOutcome::Failed(message) => {
            println!("research failed.");
            if let Some(message) = message {
                println!("{message}");
            }
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct ConfigView {
    provider: String,
    model: String,
    max_tokens: u32,
    workspace: String,
    budget: Option<u32>,
}

impl From<&EngineConfig> for ConfigView {
    fn from(config: &EngineConfig) -> Self {
        Self {
            provider: config.llm.provider.clone(),
            model: config.llm.model.clone(),
            max_tokens: config.llm.max_tokens,
            workspace: config.workspace().to_string_lossy().into_owned(),
            budget: config.research.budget,
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "deep_research_engine=info,dr_engine=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
