// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory standalone store

use super::{Batch, BatchReply, StoreCall, StoreClient};
use async_trait::async_trait;
use kvt_core::{KeyCount, ScriptRegistry, StoreError, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct StoreState {
    data: HashMap<String, String>,
    fail_next_command: Option<StoreError>,
    fail_next_exec: Option<StoreError>,
}

/// In-memory key-value store.
///
/// Understands a small string command set. Scripts registered with
/// [`MemoryStore::define_command`] reply with their KEYS followed by ARGV.
/// Every call is recorded for inspection.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
    scripts: ScriptRegistry,
    calls: Arc<Mutex<Vec<StoreCall>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store sharing an existing script registry
    pub fn with_scripts(scripts: ScriptRegistry) -> Self {
        Self {
            scripts,
            ..Self::default()
        }
    }

    /// Register a named script
    pub fn define_command(&self, name: &str, keys: KeyCount) {
        self.scripts.define(name, keys);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Read a key without going through the command path
    pub fn get_key(&self, key: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .data
            .get(key)
            .cloned()
    }

    /// Make the next single command fail with `error`
    pub fn fail_next_command(&self, error: StoreError) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .fail_next_command = Some(error);
    }

    /// Make the next batch execution fail as a unit with `error`
    pub fn fail_next_exec(&self, error: StoreError) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .fail_next_exec = Some(error);
    }

    pub(crate) fn record(&self, call: StoreCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    pub(crate) fn take_command_failure(&self) -> Option<StoreError> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .fail_next_command
            .take()
    }

    pub(crate) fn take_exec_failure(&self) -> Option<StoreError> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .fail_next_exec
            .take()
    }

    /// Run a command against the key space
    pub(crate) fn execute(&self, name: &str, args: &[Value]) -> Result<Value, StoreError> {
        if let Some(keys) = self.scripts.get(name) {
            return run_script(keys, args);
        }

        let lower = name.to_ascii_lowercase();
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let data = &mut state.data;

        match (lower.as_str(), args) {
            ("ping", []) => Ok(Value::Status("PONG".to_string())),
            ("ping", [message]) | ("echo", [message]) => Ok(Value::Str(text(message)?)),
            ("quit", []) | ("auth", [..]) | ("select", [_]) | ("flushall", []) => {
                if lower == "flushall" {
                    data.clear();
                }
                Ok(Value::ok())
            }
            ("get", [key]) => Ok(data
                .get(&text(key)?)
                .map(|v| Value::Str(v.clone()))
                .unwrap_or(Value::Nil)),
            ("set", [key, value]) => {
                data.insert(text(key)?, text(value)?);
                Ok(Value::ok())
            }
            ("del", keys) | ("exists", keys) if !keys.is_empty() => {
                let mut count = 0;
                for key in keys {
                    let key = text(key)?;
                    let hit = if lower == "del" {
                        data.remove(&key).is_some()
                    } else {
                        data.contains_key(&key)
                    };
                    if hit {
                        count += 1;
                    }
                }
                Ok(Value::Int(count))
            }
            ("incr", [key]) => incr_by(data, key, 1),
            ("decr", [key]) => incr_by(data, key, -1),
            ("incrby", [key, delta]) => {
                let delta = delta.as_int().ok_or_else(not_an_integer)?;
                incr_by(data, key, delta)
            }
            ("mget", keys) if !keys.is_empty() => {
                let mut values = Vec::with_capacity(keys.len());
                for key in keys {
                    values.push(
                        data.get(&text(key)?)
                            .map(|v| Value::Str(v.clone()))
                            .unwrap_or(Value::Nil),
                    );
                }
                Ok(Value::Array(values))
            }
            ("mset", pairs) if !pairs.is_empty() && pairs.len() % 2 == 0 => {
                for pair in pairs.chunks(2) {
                    data.insert(text(&pair[0])?, text(&pair[1])?);
                }
                Ok(Value::ok())
            }
            (
                "ping" | "echo" | "quit" | "select" | "flushall" | "get" | "set" | "del"
                | "exists" | "incr" | "decr" | "incrby" | "mget" | "mset",
                _,
            ) => Err(StoreError::Reply(format!(
                "ERR wrong number of arguments for '{}' command",
                lower
            ))),
            _ => Err(StoreError::Reply(format!("ERR unknown command '{}'", name))),
        }
    }
}

fn text(value: &Value) -> Result<String, StoreError> {
    value
        .as_text()
        .ok_or_else(|| StoreError::Reply("ERR invalid argument type".to_string()))
}

fn not_an_integer() -> StoreError {
    StoreError::Reply("ERR value is not an integer or out of range".to_string())
}

fn incr_by(
    data: &mut HashMap<String, String>,
    key: &Value,
    delta: i64,
) -> Result<Value, StoreError> {
    let key = text(key)?;
    let current = match data.get(&key) {
        Some(v) => v.parse::<i64>().map_err(|_| not_an_integer())?,
        None => 0,
    };
    let next = current.checked_add(delta).ok_or_else(not_an_integer)?;
    data.insert(key, next.to_string());
    Ok(Value::Int(next))
}

fn run_script(keys: KeyCount, args: &[Value]) -> Result<Value, StoreError> {
    if keys == KeyCount::Dynamic {
        let count = args.first().and_then(Value::as_int).ok_or_else(not_an_integer)?;
        if count < 0 {
            return Err(StoreError::Reply(
                "ERR Number of keys can't be negative".to_string(),
            ));
        }
    }
    let (keys, argv) = keys.split(args).ok_or_else(|| {
        StoreError::Reply("ERR Number of keys can't be greater than number of args".to_string())
    })?;
    Ok(Value::Array(keys.iter().chain(argv).cloned().collect()))
}

#[async_trait]
impl StoreClient for MemoryStore {
    type Batch = MemoryBatch;

    async fn command(&self, name: &str, args: &[Value]) -> Result<Value, StoreError> {
        self.record(StoreCall::Command {
            name: name.to_string(),
            args: args.to_vec(),
        });

        // Replies arrive asynchronously
        tokio::task::yield_now().await;

        if let Some(error) = self.take_command_failure() {
            return Err(error);
        }
        self.execute(name, args)
    }

    fn pipeline(&self) -> MemoryBatch {
        MemoryBatch {
            store: self.clone(),
            queued: Vec::new(),
        }
    }

    fn scripts(&self) -> &ScriptRegistry {
        &self.scripts
    }
}

/// Batch of commands queued against a [`MemoryStore`]
pub struct MemoryBatch {
    store: MemoryStore,
    queued: Vec<(String, Vec<Value>)>,
}

#[async_trait]
impl Batch for MemoryBatch {
    fn queue(&mut self, name: &str, args: Vec<Value>) -> Result<(), StoreError> {
        self.queued.push((name.to_string(), args));
        Ok(())
    }

    fn len(&self) -> usize {
        self.queued.len()
    }

    async fn exec(self) -> Result<Vec<BatchReply>, StoreError> {
        self.store.record(StoreCall::Exec {
            commands: self.queued.clone(),
        });

        tokio::task::yield_now().await;

        if let Some(error) = self.store.take_exec_failure() {
            return Err(error);
        }
        Ok(self
            .queued
            .iter()
            .map(|(name, args)| self.store.execute(name, args))
            .collect())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
