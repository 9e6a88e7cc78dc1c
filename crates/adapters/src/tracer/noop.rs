// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op tracer for when tracing is disabled.

use super::{Span, TagValue, Tracer, TracerError};

/// Tracer that records nothing.
///
/// Used when tracing is disabled or in minimal deployments.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTracer;

impl NoopTracer {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSpan;

impl Span for NoopSpan {
    fn set_tag(&self, _key: &str, _value: TagValue) -> Result<(), TracerError> {
        Ok(())
    }

    fn finish(&self) -> Result<(), TracerError> {
        Ok(())
    }
}

impl Tracer for NoopTracer {
    type Span = NoopSpan;

    fn start_span(
        &self,
        _name: &str,
        _parent: Option<&NoopSpan>,
    ) -> Result<NoopSpan, TracerError> {
        Ok(NoopSpan)
    }
}
