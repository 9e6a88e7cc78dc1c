// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::tracer::MemoryTracer;
use crate::traced::log_capture::with_tracing;

fn failure() -> StoreError {
    StoreError::Reply("ERR boom".to_string())
}

#[test]
fn open_without_parent_creates_root_span() {
    let tracer = MemoryTracer::new();
    let handle = SpanHandle::open(&tracer, None, "set");
    assert!(handle.is_recording());
    assert_eq!(handle.name(), "set");
    handle.close_success();

    let spans = tracer.spans();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].parent_id, None);
    assert!(spans[0].is_finished());
    assert!(!spans[0].has_error());
}

#[test]
fn open_with_parent_creates_child_span() {
    let tracer = MemoryTracer::new();
    let parent = tracer.start_span("request", None).unwrap();

    SpanHandle::open(&tracer, Some(&parent), "get").close_success();

    let child = &tracer.spans_named("get")[0];
    assert_eq!(child.parent_id, Some(parent.id()));
}

#[test]
fn close_failure_tags_error_and_finishes() {
    let tracer = MemoryTracer::new();
    SpanHandle::open(&tracer, None, "get").close_failure(&failure());

    let span = &tracer.spans()[0];
    assert!(span.has_error());
    assert!(span.is_finished());
}

#[test]
fn close_dispatches_on_result() {
    let tracer = MemoryTracer::new();
    SpanHandle::open(&tracer, None, "ok").close(&Ok::<_, StoreError>(1));
    SpanHandle::open(&tracer, None, "err").close(&Err::<(), _>(failure()));

    assert!(!tracer.spans_named("ok")[0].has_error());
    assert!(tracer.spans_named("err")[0].has_error());
    assert_eq!(tracer.finished().len(), 2);
}

#[test]
fn dropped_handle_leaves_span_open() {
    let tracer = MemoryTracer::new();
    let logs = with_tracing(|| {
        let handle = SpanHandle::open(&tracer, None, "get");
        drop(handle);
    });

    assert!(!tracer.spans()[0].is_finished());
    assert!(
        logs.contains("span left open"),
        "Should log abandoned span. Logs:\n{}",
        logs
    );
}

#[test]
fn failed_start_runs_untraced_and_logs() {
    let tracer = MemoryTracer::new();
    tracer.set_faulty(true);

    let logs = with_tracing(|| {
        let handle = SpanHandle::open(&tracer, None, "get");
        assert!(!handle.is_recording());
        handle.close_failure(&failure());
    });

    assert!(tracer.spans().is_empty());
    assert!(
        logs.contains("failed to start span"),
        "Should log start failure. Logs:\n{}",
        logs
    );
}

#[test]
fn failed_finish_is_swallowed_and_logged() {
    let tracer = MemoryTracer::new();
    let logs = with_tracing(|| {
        let handle = SpanHandle::open(&tracer, None, "get");
        tracer.set_faulty(true);
        handle.close_failure(&failure());
    });

    assert!(
        logs.contains("failed to tag span"),
        "Should log tag failure. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("failed to finish span"),
        "Should log finish failure. Logs:\n{}",
        logs
    );
}

#[test]
fn close_logs_elapsed_time() {
    let tracer = MemoryTracer::new();
    let logs = with_tracing(|| {
        SpanHandle::open(&tracer, None, "set").close_success();
    });

    assert!(logs.contains("span opened"), "Logs:\n{}", logs);
    assert!(logs.contains("span closed"), "Logs:\n{}", logs);
    assert!(logs.contains("elapsed_ms"), "Logs:\n{}", logs);
}
