// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced pipeline batches

use super::lifecycle::SpanHandle;
use crate::store::{Batch, BatchReply};
use crate::tracer::{Span, Tracer};
use kvt_core::{StoreError, Value, PIPELINE};
use tracing::Instrument;

/// A store batch with one span covering the whole batch.
///
/// The span opens when the batch is created and closes when [`exec`]
/// settles. Queued commands get no spans of their own. The span is only
/// marked failed when the batch fails as a unit; an error reply for one
/// queued command does not count.
///
/// [`exec`]: TracedBatch::exec
pub struct TracedBatch<S: Span, B: Batch> {
    inner: B,
    handle: SpanHandle<S>,
}

impl<S: Span, B: Batch> TracedBatch<S, B> {
    pub(crate) fn begin<T>(tracer: &T, parent: Option<&S>, inner: B) -> Self
    where
        T: Tracer<Span = S>,
    {
        Self {
            inner,
            handle: SpanHandle::open(tracer, parent, PIPELINE),
        }
    }

    /// Queue a command on the underlying batch
    pub fn queue(&mut self, name: &str, args: Vec<Value>) -> Result<(), StoreError> {
        self.inner.queue(name, args)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Execute the batch and close its span
    pub async fn exec(self) -> Result<Vec<BatchReply>, StoreError> {
        let Self { inner, handle } = self;
        let queued = inner.len();

        let result = inner
            .exec()
            .instrument(tracing::debug_span!("kvt.pipeline", queued))
            .await;

        match &result {
            Ok(replies) => tracing::debug!(
                queued,
                failed = replies.iter().filter(|r| r.is_err()).count(),
                "pipeline executed"
            ),
            Err(e) => tracing::debug!(queued, error = %e, "pipeline failed"),
        }

        handle.close(&result);
        result
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
