// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replay script errors

use kvt_adapters::TracerError;
use thiserror::Error;

/// A replay script that cannot be parsed or run.
///
/// Store errors are never reported here; they are replies.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: unknown span '{label}'")]
    UnknownSpan { line: usize, label: String },

    #[error("line {line}: span '{label}' already exists")]
    DuplicateSpan { line: usize, label: String },

    #[error("line {line}: pipeline already open (opened on line {opened})")]
    NestedPipeline { line: usize, opened: usize },

    #[error("line {line}: '{directive}' is not allowed inside a pipeline")]
    NotInPipeline {
        line: usize,
        directive: &'static str,
    },

    #[error("line {line}: exec without an open pipeline")]
    ExecWithoutPipeline { line: usize },

    #[error("line {line}: pipeline is never executed")]
    UnterminatedPipeline { line: usize },

    #[error("line {line}: {source}")]
    Tracer { line: usize, source: TracerError },
}

