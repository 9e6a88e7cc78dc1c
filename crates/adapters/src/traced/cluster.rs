// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing for clustered stores
//!
//! Identical naming and tagging to the standalone wrapper. On top of that
//! it logs key routing for scripts and any rejection the cluster returns.

use super::{Instrumented, Traced, TracedBatch};
use crate::store::{Batch, BatchReply, ClusterClient, StoreClient};
use crate::tracer::{Span, Tracer};
use async_trait::async_trait;
use kvt_core::{Category, CommandDescriptor, ScriptRegistry, StoreError, Value};

/// Clustered store client wrapped with a tracer
#[derive(Clone)]
pub struct InstrumentedCluster<T, C> {
    inner: Instrumented<T, C>,
}

/// Bind a tracer to a clustered store client
pub fn instrument_cluster<T: Tracer, C: ClusterClient>(
    tracer: T,
    cluster: C,
) -> InstrumentedCluster<T, C> {
    InstrumentedCluster {
        inner: super::instrument(tracer, cluster),
    }
}

impl<T: Tracer, C: ClusterClient> InstrumentedCluster<T, C> {
    /// The wrapped client; calls made on it are not traced
    pub fn client(&self) -> &C {
        self.inner.client()
    }

    pub fn tracer(&self) -> &T {
        self.inner.tracer()
    }

    pub fn classify(&self, name: &str) -> CommandDescriptor {
        self.inner.classify(name)
    }

    /// Start a traced batch; its single span opens now
    pub fn begin_batch(&self, context: Option<&T::Span>) -> ClusterBatch<T::Span, C::Batch> {
        ClusterBatch {
            inner: self.inner.begin_batch(context),
        }
    }

    /// Same contract as [`Instrumented::traced`]
    pub async fn traced(
        &self,
        context: Option<&T::Span>,
        name: &str,
        args: &[Value],
    ) -> Result<Traced<ClusterBatch<T::Span, C::Batch>>, StoreError> {
        let descriptor = self.classify(name);
        match descriptor.category {
            Category::Restricted => self.client().command(name, args).await.map(Traced::Reply),
            Category::BatchControl => Ok(Traced::Batch(self.begin_batch(context))),
            Category::Command | Category::Script(_) => {
                self.log_routing(&descriptor, args);
                let result = self.inner.call(context, &descriptor, args).await;
                if let Err(e) = &result {
                    log_rejection(name, e);
                }
                result.map(Traced::Reply)
            }
        }
    }

    fn log_routing(&self, descriptor: &CommandDescriptor, args: &[Value]) {
        let Some(keys) = descriptor.script_keys(args) else {
            return;
        };
        let slots: Vec<u16> = keys
            .iter()
            .filter_map(Value::as_text)
            .map(|k| self.client().slot_for(&k))
            .collect();
        let nodes: Vec<usize> = slots
            .iter()
            .map(|&s| self.client().node_for_slot(s))
            .collect();
        tracing::debug!(
            command = %descriptor.name,
            ?slots,
            ?nodes,
            "script key routing"
        );
    }
}

fn log_rejection(command: &str, error: &StoreError) {
    if error.is_cluster_rejection() {
        tracing::warn!(
            command,
            kind = error.kind(),
            message = error.message(),
            "cluster rejected operation"
        );
    }
}

#[async_trait]
impl<T: Tracer, C: ClusterClient> StoreClient for InstrumentedCluster<T, C> {
    type Batch = C::Batch;

    async fn command(&self, name: &str, args: &[Value]) -> Result<Value, StoreError> {
        self.inner.command(name, args).await
    }

    fn pipeline(&self) -> C::Batch {
        self.inner.pipeline()
    }

    fn scripts(&self) -> &ScriptRegistry {
        self.inner.scripts()
    }
}

impl<T: Tracer, C: ClusterClient> ClusterClient for InstrumentedCluster<T, C> {
    fn node_count(&self) -> usize {
        self.client().node_count()
    }
}

/// Traced batch for a clustered store
pub struct ClusterBatch<S: Span, B: Batch> {
    inner: TracedBatch<S, B>,
}

impl<S: Span, B: Batch> ClusterBatch<S, B> {
    pub fn queue(&mut self, name: &str, args: Vec<Value>) -> Result<(), StoreError> {
        self.inner.queue(name, args)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Execute the batch; a cluster rejection fails it and tags the span
    pub async fn exec(self) -> Result<Vec<BatchReply>, StoreError> {
        let result = self.inner.exec().await;
        if let Err(e) = &result {
            log_rejection(kvt_core::PIPELINE, e);
        }
        result
    }
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod tests;
