// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use clap::ValueEnum;
use kvt_adapters::SpanRecord;
use kvt_core::{Category, StoreError, Value};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print output in the specified format
pub fn print<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => print!("{}", value),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }
}

/// Print a list of items
pub fn print_list<T: Serialize + fmt::Display>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for item in items {
                println!("{}", item);
            }
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(items) {
                println!("{}", json);
            }
        }
    }
}

/// Result of one store call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Reply(Value),
    Error { kind: &'static str, message: String },
}

impl From<Result<Value, StoreError>> for Outcome {
    fn from(result: Result<Value, StoreError>) -> Self {
        match result {
            Ok(value) => Outcome::Reply(value),
            Err(e) => Outcome::Error {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Reply(value) => write!(f, "{}", value),
            Outcome::Error { message, .. } => write!(f, "(error) {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyEntry {
    pub line: usize,
    pub command: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Everything a replay produced
#[derive(Debug, Serialize)]
pub struct Report {
    pub replies: Vec<ReplyEntry>,
    pub spans: Vec<SpanRecord>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.replies {
            writeln!(f, "{}", entry.outcome)?;
        }
        writeln!(f)?;

        if self.spans.is_empty() {
            return writeln!(f, "No spans");
        }
        writeln!(
            f,
            "{:<4} {:<6} {:<20} {:<8} TAGS",
            "ID", "PARENT", "NAME", "STATE"
        )?;
        for span in &self.spans {
            let parent = span
                .parent_id
                .map_or_else(|| "-".to_string(), |id| id.to_string());
            let state = if span.is_finished() { "finished" } else { "open" };
            let tags = if span.tags.is_empty() {
                "-".to_string()
            } else {
                span.tags
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join(",")
            };
            writeln!(
                f,
                "{:<4} {:<6} {:<20} {:<8} {}",
                span.id, parent, span.name, state, tags
            )?;
        }
        Ok(())
    }
}

/// A command name and how it would be traced
#[derive(Debug, Serialize)]
pub struct Classified {
    pub name: String,
    #[serde(serialize_with = "display")]
    pub category: Category,
    pub traced: bool,
}

fn display<T: fmt::Display, S: serde::Serializer>(value: &T, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(value)
}

impl fmt::Display for Classified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<20} {}", self.name, self.category)
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
