// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kvt - traced key-value store client

mod commands;
mod error;
mod output;
mod replay;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{classify, replay as replay_cmd};
use kvt_core::config::DEFAULT_CLUSTER_NODES;
use kvt_core::{Config, ScriptRegistry};
use output::OutputFormat;
use std::path::PathBuf;

/// Environment variable holding an `EnvFilter` directive
const LOG_ENV: &str = "KVT_LOG";

#[derive(Parser)]
#[command(
    name = "kvt",
    version,
    about = "kvt - Replay store commands through a tracing client"
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Run against a clustered store
    #[arg(long, global = true)]
    cluster: bool,

    /// Number of cluster nodes (implies --cluster)
    #[arg(long, global = true, value_parser = clap::value_parser!(u16).range(1..))]
    nodes: Option<u16>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a command script and print replies and spans
    Replay(replay_cmd::ReplayArgs),
    /// Show how command names would be traced
    Classify(classify::ClassifyArgs),
}

impl Cli {
    /// Node count when running clustered; flags win over config
    fn cluster_nodes(&self, config: &Config) -> Option<usize> {
        match (self.nodes, &config.cluster) {
            (Some(nodes), _) => Some(usize::from(nodes)),
            (None, Some(cluster)) => Some(cluster.nodes),
            (None, None) if self.cluster => Some(DEFAULT_CLUSTER_NODES),
            (None, None) => None,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    setup_logging(&config.log.filter)?;

    let cluster_nodes = cli.cluster_nodes(&config);
    match cli.command {
        Commands::Replay(args) => {
            replay_cmd::replay(args, &config, cluster_nodes, cli.format).await?;
        }
        Commands::Classify(args) => {
            let scripts = ScriptRegistry::new();
            config.register_scripts(&scripts);
            classify::classify(args, &scripts, cli.format);
        }
    }

    Ok(())
}

fn setup_logging(config_filter: &str) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config_filter)
            .with_context(|| format!("invalid log filter '{}'", config_filter))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}
