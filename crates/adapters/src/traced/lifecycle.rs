// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Span lifecycle for a single wrapped operation
//!
//! A [`SpanHandle`] is opened before the operation starts and closed exactly
//! once when it settles. Closing consumes the handle. Tracer failures are
//! logged and swallowed so they never reach the caller.

use crate::tracer::{Span, TagValue, Tracer, ERROR_TAG};
use kvt_core::StoreError;
use std::time::Instant;

/// Exclusive owner of one in-flight span
pub struct SpanHandle<S: Span> {
    span: Option<S>,
    name: String,
    started: Instant,
}

impl<S: Span> SpanHandle<S> {
    /// Start a span named `name`, as a child of `parent` or as a root.
    ///
    /// If the tracer cannot start a span the handle is inert and the
    /// operation runs untraced.
    pub fn open<T>(tracer: &T, parent: Option<&S>, name: &str) -> Self
    where
        T: Tracer<Span = S>,
    {
        let span = match tracer.start_span(name, parent) {
            Ok(span) => {
                tracing::debug!(span = name, root = parent.is_none(), "span opened");
                Some(span)
            }
            Err(e) => {
                tracing::warn!(span = name, error = %e, "failed to start span, running untraced");
                None
            }
        };

        Self {
            span,
            name: name.to_string(),
            started: Instant::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the tracer handed out a span for this operation
    pub fn is_recording(&self) -> bool {
        self.span.is_some()
    }

    /// Close according to the operation's outcome
    pub fn close<T>(self, result: &Result<T, StoreError>) {
        match result {
            Ok(_) => self.close_success(),
            Err(e) => self.close_failure(e),
        }
    }

    pub fn close_success(mut self) {
        if let Some(span) = self.span.take() {
            self.finish(&span);
            tracing::debug!(
                span = %self.name,
                elapsed_ms = self.started.elapsed().as_millis() as u64,
                "span closed"
            );
        }
    }

    /// Tag the span with `error = true`, then finish it
    pub fn close_failure(mut self, error: &StoreError) {
        if let Some(span) = self.span.take() {
            if let Err(e) = span.set_tag(ERROR_TAG, TagValue::Bool(true)) {
                tracing::warn!(span = %self.name, error = %e, "failed to tag span");
            }
            self.finish(&span);
            tracing::debug!(
                span = %self.name,
                elapsed_ms = self.started.elapsed().as_millis() as u64,
                kind = error.kind(),
                "span closed with error"
            );
        }
    }

    fn finish(&self, span: &S) {
        if let Err(e) = span.finish() {
            tracing::warn!(span = %self.name, error = %e, "failed to finish span");
        }
    }
}

impl<S: Span> Drop for SpanHandle<S> {
    fn drop(&mut self) {
        // The wrapped operation never settled (its future was dropped)
        if self.span.is_some() {
            tracing::debug!(span = %self.name, "operation dropped before settling, span left open");
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
