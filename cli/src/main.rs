use anyhow::Result;
use clap::Parser;
use log::{debug, info, warn};
use std::fs;
use std::sync::Arc;

use asione_core::{AgentConfig, load_env_file};
use asione_memory::config::default_config_dir;
use asione_memory::{KnowledgeBase, KnowledgeConfig, KnowledgeIntegrator};

mod app;
mod cli;
mod commands;
mod console;
mod email;
mod executor;
mod extract;
mod logging;
mod output;
mod system_info;
mod transcript;

use crate::app::Agent;
use crate::cli::Args;
use crate::console::Console;
use crate::logging::init_logging;
use crate::output::{print_banner, print_notice, print_system_info};
use crate::system_info::SystemInfo;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load the env file first so ASIONE_LOG from it is honored
    let env_file = load_env_file(args.env_file.as_deref());
    init_logging(args.log_level.as_deref());
    match &env_file {
        Some(path) => debug!("Environment loaded from {}", path.display()),
        None => debug!("No environment file, using process environment"),
    }

    let config = AgentConfig::from_env();
    if config.search.api_key.is_none() {
        print_notice("Avertissement: aucune clé API de recherche configurée (SEARCH_API_KEY). Les fonctionnalités de recherche seront limitées.");
    }

    let knowledge = if args.no_memory {
        info!("Long-term memory disabled by --no-memory");
        None
    } else {
        open_knowledge()
    };

    let system = SystemInfo::detect();
    print_banner();
    print_system_info(&system);

    let mut agent = Agent::new(config, knowledge, &system, Console::stdin());
    agent.run().await
}

/// Opens the knowledge store; any failure leaves the agent without memory.
fn open_knowledge() -> Option<KnowledgeIntegrator> {
    let config = KnowledgeConfig::from_env();
    if !config.enabled {
        info!("Long-term memory disabled by KNOWLEDGE_ENABLED");
        return None;
    }

    let config_dir = default_config_dir();
    if let Err(e) = fs::create_dir_all(&config_dir) {
        warn!("Cannot create {}: {}", config_dir.display(), e);
    }

    match KnowledgeBase::from_config(&config) {
        Ok(store) => {
            info!(
                "Knowledge store {} holds {} entries",
                store.file_path().display(),
                store.len()
            );
            Some(KnowledgeIntegrator::new(Arc::new(store)))
        }
        Err(e) => {
            warn!("Knowledge store unavailable: {}", e);
            print_notice(&format!(
                "Avertissement: impossible d'initialiser la base de connaissances: {}",
                e
            ));
            None
        }
    }
}
