// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Distributed-tracing backend adapters

mod memory;
mod noop;

pub use memory::{MemorySpan, MemoryTracer, SpanRecord};
pub use noop::{NoopSpan, NoopTracer};

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Tag set on spans whose wrapped operation failed
pub const ERROR_TAG: &str = "error";

/// Errors raised inside a tracer backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TracerError {
    #[error("span already finished: {0}")]
    AlreadyFinished(String),
    #[error("tracer backend error: {0}")]
    Backend(String),
}

/// Scalar tag value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Bool(b) => write!(f, "{}", b),
            TagValue::Int(n) => write!(f, "{}", n),
            TagValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for TagValue {
    fn from(b: bool) -> Self {
        TagValue::Bool(b)
    }
}

impl From<i64> for TagValue {
    fn from(n: i64) -> Self {
        TagValue::Int(n)
    }
}

impl From<&str> for TagValue {
    fn from(s: &str) -> Self {
        TagValue::Str(s.to_string())
    }
}

/// A span handed out by a [`Tracer`]
pub trait Span: Send + Sync + 'static {
    fn set_tag(&self, key: &str, value: TagValue) -> Result<(), TracerError>;

    fn finish(&self) -> Result<(), TracerError>;
}

/// Adapter for a tracing backend
pub trait Tracer: Clone + Send + Sync + 'static {
    type Span: Span;

    /// Start a span as a child of `parent`, or as a root span when `None`
    fn start_span(&self, name: &str, parent: Option<&Self::Span>)
        -> Result<Self::Span, TracerError>;
}
