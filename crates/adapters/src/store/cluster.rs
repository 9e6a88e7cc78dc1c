// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory clustered store
//!
//! Keys are routed to nodes by slot. Like a real cluster it refuses
//! multi-key operations whose keys span slots, and refuses to execute
//! pipelines holding custom commands.

use super::{Batch, BatchReply, ClusterClient, MemoryStore, StoreCall, StoreClient};
use async_trait::async_trait;
use kvt_core::{key_slot, KeyCount, ScriptRegistry, StoreError, Value};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

pub const CROSSSLOT_MESSAGE: &str = "CROSSSLOT Keys in request don't hash to the same slot";
pub const CUSTOM_COMMAND_IN_PIPELINE_MESSAGE: &str =
    "Sending custom commands in pipeline is not supported in Cluster mode.";
pub const PIPELINE_SLOT_MISMATCH_MESSAGE: &str =
    "All keys in the pipeline should belong to the same slot";

#[derive(Default)]
struct Failures {
    next_command: Option<StoreError>,
    next_exec: Option<StoreError>,
}

/// In-memory cluster of [`MemoryStore`] nodes sharing one script registry
#[derive(Clone)]
pub struct MemoryCluster {
    nodes: Arc<Vec<MemoryStore>>,
    scripts: ScriptRegistry,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    failures: Arc<Mutex<Failures>>,
}

impl MemoryCluster {
    /// Create a cluster with `nodes` nodes (at least one)
    pub fn new(nodes: usize) -> Self {
        let scripts = ScriptRegistry::new();
        let nodes = (0..nodes.max(1))
            .map(|_| MemoryStore::with_scripts(scripts.clone()))
            .collect();
        Self {
            nodes: Arc::new(nodes),
            scripts,
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(Failures::default())),
        }
    }

    /// Register a named script on every node
    pub fn define_command(&self, name: &str, keys: KeyCount) {
        self.scripts.define(name, keys);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn node(&self, index: usize) -> Option<&MemoryStore> {
        self.nodes.get(index)
    }

    /// Make the next single command fail with `error`
    pub fn fail_next_command(&self, error: StoreError) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .next_command = Some(error);
    }

    /// Make the next batch execution fail as a unit with `error`
    pub fn fail_next_exec(&self, error: StoreError) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .next_exec = Some(error);
    }

    fn record(&self, call: StoreCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    /// Keys a command touches, in argument order
    fn keys_of(&self, name: &str, args: &[Value]) -> Vec<String> {
        let keys: &[Value] = if let Some(count) = self.scripts.get(name) {
            count.split(args).map(|(keys, _)| keys).unwrap_or(&[])
        } else {
            match name.to_ascii_lowercase().as_str() {
                "get" | "set" | "incr" | "decr" | "incrby" => args.get(..1).unwrap_or(&[]),
                "del" | "exists" | "mget" => args,
                "mset" => {
                    return args
                        .iter()
                        .step_by(2)
                        .filter_map(Value::as_text)
                        .collect();
                }
                _ => &[],
            }
        };
        keys.iter().filter_map(Value::as_text).collect()
    }

    /// Single slot shared by all keys; `Ok(None)` when there are no keys
    fn slot_of(&self, keys: &[String]) -> Result<Option<u16>, StoreError> {
        let slots: BTreeSet<u16> = keys.iter().map(|k| key_slot(k)).collect();
        match slots.len() {
            0 => Ok(None),
            1 => Ok(slots.into_iter().next()),
            _ => Err(StoreError::CrossSlot(CROSSSLOT_MESSAGE.to_string())),
        }
    }

    fn node_for(&self, slot: Option<u16>) -> &MemoryStore {
        let index = slot.map(|s| self.node_for_slot(s)).unwrap_or(0);
        &self.nodes[index.min(self.nodes.len() - 1)]
    }
}

#[async_trait]
impl StoreClient for MemoryCluster {
    type Batch = MemoryClusterBatch;

    async fn command(&self, name: &str, args: &[Value]) -> Result<Value, StoreError> {
        self.record(StoreCall::Command {
            name: name.to_string(),
            args: args.to_vec(),
        });

        tokio::task::yield_now().await;

        let injected = self
            .failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .next_command
            .take();
        if let Some(error) = injected {
            return Err(error);
        }

        let slot = self.slot_of(&self.keys_of(name, args))?;
        self.node_for(slot).execute(name, args)
    }

    fn pipeline(&self) -> MemoryClusterBatch {
        MemoryClusterBatch {
            cluster: self.clone(),
            queued: Vec::new(),
            has_custom_command: false,
        }
    }

    fn scripts(&self) -> &ScriptRegistry {
        &self.scripts
    }
}

impl ClusterClient for MemoryCluster {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Batch of commands queued against a [`MemoryCluster`]
pub struct MemoryClusterBatch {
    cluster: MemoryCluster,
    queued: Vec<(String, Vec<Value>)>,
    has_custom_command: bool,
}

#[async_trait]
impl Batch for MemoryClusterBatch {
    /// Custom commands are accepted here and fail the batch at exec
    fn queue(&mut self, name: &str, args: Vec<Value>) -> Result<(), StoreError> {
        self.has_custom_command |= self.cluster.scripts.contains(name);
        self.queued.push((name.to_string(), args));
        Ok(())
    }

    fn len(&self) -> usize {
        self.queued.len()
    }

    async fn exec(self) -> Result<Vec<BatchReply>, StoreError> {
        self.cluster.record(StoreCall::Exec {
            commands: self.queued.clone(),
        });

        tokio::task::yield_now().await;

        if self.has_custom_command {
            return Err(StoreError::Rejected(
                CUSTOM_COMMAND_IN_PIPELINE_MESSAGE.to_string(),
            ));
        }

        let injected = self
            .cluster
            .failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .next_exec
            .take();
        if let Some(error) = injected {
            return Err(error);
        }

        let keys: Vec<String> = self
            .queued
            .iter()
            .flat_map(|(name, args)| self.cluster.keys_of(name, args))
            .collect();
        let slot = self
            .cluster
            .slot_of(&keys)
            .map_err(|_| StoreError::Rejected(PIPELINE_SLOT_MISMATCH_MESSAGE.to_string()))?;

        let node = self.cluster.node_for(slot);
        Ok(self
            .queued
            .iter()
            .map(|(name, args)| node.execute(name, args))
            .collect())
    }
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod tests;
