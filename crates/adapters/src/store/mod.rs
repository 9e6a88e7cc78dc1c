// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Key-value store client adapters

mod cluster;
mod memory;

pub use cluster::{
    MemoryCluster, MemoryClusterBatch, CROSSSLOT_MESSAGE,
    CUSTOM_COMMAND_IN_PIPELINE_MESSAGE, PIPELINE_SLOT_MISMATCH_MESSAGE,
};
pub use memory::{MemoryBatch, MemoryStore};

use async_trait::async_trait;
use kvt_core::{key_slot, ScriptRegistry, StoreError, Value};

/// Reply for one queued sub-command of an executed batch
pub type BatchReply = Result<Value, StoreError>;

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Command { name: String, args: Vec<Value> },
    Exec { commands: Vec<(String, Vec<Value>)> },
}

/// A queued batch of commands produced by a [`StoreClient`]
#[async_trait]
pub trait Batch: Send + 'static {
    /// Queue a command without executing it
    fn queue(&mut self, name: &str, args: Vec<Value>) -> Result<(), StoreError>;

    /// Number of queued commands
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Execute all queued commands in order.
    ///
    /// `Err` means the batch failed as a unit; individual command errors are
    /// reported inside the reply list.
    async fn exec(self) -> Result<Vec<BatchReply>, StoreError>;
}

/// Adapter for a key-value store client
#[async_trait]
pub trait StoreClient: Clone + Send + Sync + 'static {
    type Batch: Batch;

    /// Issue a single command
    async fn command(&self, name: &str, args: &[Value]) -> Result<Value, StoreError>;

    /// Start a pipelined batch
    fn pipeline(&self) -> Self::Batch;

    /// Named custom commands (scripts) known to this client
    fn scripts(&self) -> &ScriptRegistry;
}

/// A store client for a clustered deployment
pub trait ClusterClient: StoreClient {
    /// Number of nodes the slot space is divided across
    fn node_count(&self) -> usize;

    /// Slot a key maps to
    fn slot_for(&self, key: &str) -> u16 {
        key_slot(key)
    }

    /// Index of the node owning a slot
    fn node_for_slot(&self, slot: u16) -> usize {
        let nodes = self.node_count().max(1);
        usize::from(slot) * nodes / usize::from(kvt_core::SLOT_COUNT)
    }
}
