// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kvt replay <file>` - Replay a command script through a traced client

use crate::output::{self, OutputFormat};
use crate::replay::{script, Replayer, Target};
use anyhow::{Context, Result};
use clap::Args;
use kvt_adapters::MemoryTracer;
use kvt_core::Config;
use std::path::PathBuf;

#[derive(Args)]
pub struct ReplayArgs {
    /// Script file, one directive per line
    pub file: PathBuf,
}

pub async fn replay(
    args: ReplayArgs,
    config: &Config,
    cluster_nodes: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let source = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read script {}", args.file.display()))?;
    let lines = script::parse(&source)
        .with_context(|| format!("invalid script {}", args.file.display()))?;

    let tracer = MemoryTracer::new();
    let target = match cluster_nodes {
        Some(nodes) => Target::cluster(tracer.clone(), nodes),
        None => Target::standalone(tracer.clone()),
    };
    config.register_scripts(target.scripts());

    tracing::debug!(
        file = %args.file.display(),
        lines = lines.len(),
        ?cluster_nodes,
        "replaying script"
    );

    let report = Replayer::new(tracer, target)
        .run(lines)
        .await
        .with_context(|| format!("replay of {} failed", args.file.display()))?;

    output::print(&report, format);
    Ok(())
}
