// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced store client wrappers
//!
//! [`instrument`] binds a tracer to a store client. The resulting
//! [`Instrumented`] client is itself a [`StoreClient`]: direct calls pass
//! straight through, while [`Instrumented::traced`] opens a span for every
//! traceable command and closes it when the reply arrives.

mod batch;
mod cluster;
mod lifecycle;
#[cfg(test)]
mod log_capture;

pub use batch::TracedBatch;
pub use cluster::{instrument_cluster, ClusterBatch, InstrumentedCluster};
pub use lifecycle::SpanHandle;

use crate::store::StoreClient;
use crate::tracer::Tracer;
use async_trait::async_trait;
use kvt_core::{classify, Category, CommandDescriptor, ScriptRegistry, StoreError, Value};
use tracing::Instrument;

/// Outcome of [`Instrumented::traced`]
pub enum Traced<B> {
    /// Reply of an executed command
    Reply(Value),
    /// A batch was started instead of issuing a command
    Batch(B),
}

impl<B> Traced<B> {
    pub fn into_reply(self) -> Option<Value> {
        match self {
            Traced::Reply(value) => Some(value),
            Traced::Batch(_) => None,
        }
    }

    pub fn into_batch(self) -> Option<B> {
        match self {
            Traced::Reply(_) => None,
            Traced::Batch(batch) => Some(batch),
        }
    }
}

impl<B> std::fmt::Debug for Traced<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Traced::Reply(value) => f.debug_tuple("Reply").field(value).finish(),
            Traced::Batch(_) => f.write_str("Batch(..)"),
        }
    }
}

/// Store client wrapped with a tracer
#[derive(Clone)]
pub struct Instrumented<T, C> {
    tracer: T,
    client: C,
}

/// Bind a tracer to a store client
pub fn instrument<T: Tracer, C: StoreClient>(tracer: T, client: C) -> Instrumented<T, C> {
    Instrumented { tracer, client }
}

impl<T: Tracer, C: StoreClient> Instrumented<T, C> {
    /// The wrapped client; calls made on it are not traced
    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    /// Classify against the client's live script registry
    pub fn classify(&self, name: &str) -> CommandDescriptor {
        classify(name, self.client.scripts())
    }

    /// Start a traced batch; its single span opens now
    pub fn begin_batch(&self, context: Option<&T::Span>) -> TracedBatch<T::Span, C::Batch> {
        TracedBatch::begin(&self.tracer, context, self.client.pipeline())
    }

    /// Issue `name` under a span parented to `context` (a root span if `None`).
    ///
    /// Restricted commands are passed straight through without a span, and
    /// `pipeline` returns a [`TracedBatch`] without issuing anything. The
    /// reply or error is returned exactly as the client produced it.
    pub async fn traced(
        &self,
        context: Option<&T::Span>,
        name: &str,
        args: &[Value],
    ) -> Result<Traced<TracedBatch<T::Span, C::Batch>>, StoreError> {
        let descriptor = self.classify(name);
        match descriptor.category {
            Category::Restricted => {
                tracing::trace!(command = name, "restricted, not traced");
                self.client.command(name, args).await.map(Traced::Reply)
            }
            Category::BatchControl => Ok(Traced::Batch(self.begin_batch(context))),
            Category::Command | Category::Script(_) => self
                .call(context, &descriptor, args)
                .await
                .map(Traced::Reply),
        }
    }

    /// Run a traceable command inside its own span
    pub(crate) async fn call(
        &self,
        context: Option<&T::Span>,
        descriptor: &CommandDescriptor,
        args: &[Value],
    ) -> Result<Value, StoreError> {
        let handle = SpanHandle::open(&self.tracer, context, &descriptor.name);
        let log_span = tracing::debug_span!(
            "kvt.command",
            command = %descriptor.name,
            category = %descriptor.category,
        );

        let result = self
            .client
            .command(&descriptor.name, args)
            .instrument(log_span)
            .await;

        if let Err(e) = &result {
            tracing::debug!(command = %descriptor.name, error = %e, "command failed");
        }
        handle.close(&result);
        result
    }
}

#[async_trait]
impl<T: Tracer, C: StoreClient> StoreClient for Instrumented<T, C> {
    type Batch = C::Batch;

    async fn command(&self, name: &str, args: &[Value]) -> Result<Value, StoreError> {
        self.client.command(name, args).await
    }

    fn pipeline(&self) -> C::Batch {
        self.client.pipeline()
    }

    fn scripts(&self) -> &ScriptRegistry {
        self.client.scripts()
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
