// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kvt classify <name>...` - Show how commands would be traced

use crate::output::{self, Classified, OutputFormat};
use clap::Args;
use kvt_core::ScriptRegistry;

#[derive(Args)]
pub struct ClassifyArgs {
    /// Command or script names
    #[arg(required = true)]
    pub names: Vec<String>,
}

pub fn classify(args: ClassifyArgs, scripts: &ScriptRegistry, format: OutputFormat) {
    let classified: Vec<Classified> = args
        .names
        .into_iter()
        .map(|name| {
            let category = kvt_core::classify(&name, scripts).category;
            Classified {
                name,
                traced: category.is_traced(),
                category,
            }
        })
        .collect();
    output::print_list(&classified, format);
}
