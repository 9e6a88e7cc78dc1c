// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory tracer that records spans for inspection and reporting

use super::{Span, TagValue, Tracer, TracerError, ERROR_TAG};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Snapshot of a recorded span
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanRecord {
    pub id: u64,
    pub trace_id: Uuid,
    pub parent_id: Option<u64>,
    pub name: String,
    pub tags: BTreeMap<String, TagValue>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl SpanRecord {
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn tag(&self, key: &str) -> Option<&TagValue> {
        self.tags.get(key)
    }

    /// Whether the span carries `error = true`
    pub fn has_error(&self) -> bool {
        self.tag(ERROR_TAG) == Some(&TagValue::Bool(true))
    }
}

#[derive(Default)]
struct TracerState {
    spans: Vec<SpanRecord>,
    finish_order: Vec<u64>,
    next_id: u64,
    faulty: bool,
}

impl TracerState {
    fn record_mut(&mut self, id: u64) -> Result<&mut SpanRecord, TracerError> {
        self.spans
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| TracerError::Backend(format!("unknown span {}", id)))
    }

    fn check_healthy(&self) -> Result<(), TracerError> {
        if self.faulty {
            return Err(TracerError::Backend("tracer unavailable".to_string()));
        }
        Ok(())
    }
}

/// Tracer that keeps every span in memory
#[derive(Clone, Default)]
pub struct MemoryTracer {
    state: Arc<Mutex<TracerState>>,
}

impl MemoryTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// All spans in start order
    pub fn spans(&self) -> Vec<SpanRecord> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .spans
            .clone()
    }

    /// Finished spans in finish order
    pub fn finished(&self) -> Vec<SpanRecord> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state
            .finish_order
            .iter()
            .filter_map(|id| state.spans.iter().find(|s| s.id == *id).cloned())
            .collect()
    }

    /// Spans with the given operation name, in start order
    pub fn spans_named(&self, name: &str) -> Vec<SpanRecord> {
        self.spans().into_iter().filter(|s| s.name == name).collect()
    }

    /// When set, every tracer call fails with a backend error
    pub fn set_faulty(&self, faulty: bool) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).faulty = faulty;
    }
}

impl Tracer for MemoryTracer {
    type Span = MemorySpan;

    fn start_span(
        &self,
        name: &str,
        parent: Option<&MemorySpan>,
    ) -> Result<MemorySpan, TracerError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.check_healthy()?;

        state.next_id += 1;
        let id = state.next_id;
        let trace_id = parent.map(|p| p.trace_id).unwrap_or_else(Uuid::new_v4);

        state.spans.push(SpanRecord {
            id,
            trace_id,
            parent_id: parent.map(|p| p.id),
            name: name.to_string(),
            tags: BTreeMap::new(),
            started_at: Utc::now(),
            finished_at: None,
        });

        Ok(MemorySpan {
            id,
            trace_id,
            state: Arc::clone(&self.state),
        })
    }
}

/// Span recorded by a [`MemoryTracer`]
pub struct MemorySpan {
    id: u64,
    trace_id: Uuid,
    state: Arc<Mutex<TracerState>>,
}

impl MemorySpan {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn trace_id(&self) -> Uuid {
        self.trace_id
    }
}

impl std::fmt::Debug for MemorySpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySpan")
            .field("id", &self.id)
            .field("trace_id", &self.trace_id)
            .finish()
    }
}

impl Span for MemorySpan {
    fn set_tag(&self, key: &str, value: TagValue) -> Result<(), TracerError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.check_healthy()?;
        let record = state.record_mut(self.id)?;
        record.tags.insert(key.to_string(), value);
        Ok(())
    }

    fn finish(&self) -> Result<(), TracerError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.check_healthy()?;
        let record = state.record_mut(self.id)?;
        if record.finished_at.is_some() {
            return Err(TracerError::AlreadyFinished(record.name.clone()));
        }
        record.finished_at = Some(Utc::now());
        state.finish_order.push(self.id);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
