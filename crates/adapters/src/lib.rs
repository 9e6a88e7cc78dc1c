// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Store clients, tracers, and the traced wrappers that join them

pub mod store;
pub mod traced;
pub mod tracer;

pub use store::{
    Batch, BatchReply, ClusterClient, MemoryBatch, MemoryCluster, MemoryClusterBatch,
    MemoryStore, StoreCall, StoreClient, CROSSSLOT_MESSAGE, CUSTOM_COMMAND_IN_PIPELINE_MESSAGE,
    PIPELINE_SLOT_MISMATCH_MESSAGE,
};
pub use traced::{
    instrument, instrument_cluster, ClusterBatch, Instrumented, InstrumentedCluster, SpanHandle,
    Traced, TracedBatch,
};
pub use tracer::{
    MemorySpan, MemoryTracer, NoopSpan, NoopTracer, Span, SpanRecord, TagValue, Tracer,
    TracerError, ERROR_TAG,
};
