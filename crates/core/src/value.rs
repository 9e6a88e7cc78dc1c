// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store reply and argument values

use serde::Serialize;
use std::fmt;

/// A value exchanged with a key-value store: command arguments and replies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Nil,
    Int(i64),
    /// Bulk string
    Str(String),
    /// Simple status reply such as `OK` or `PONG`
    Status(String),
    Array(Vec<Value>),
}

impl Value {
    pub fn ok() -> Self {
        Value::Status("OK".to_string())
    }

    /// Textual form used for keys and string arguments
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Str(s) | Value::Status(s) => Some(s.clone()),
            Value::Int(n) => Some(n.to_string()),
            Value::Nil | Value::Array(_) => None,
        }
    }

    /// Integer form, parsing strings the way the store does
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Str(s) | Value::Status(s) => s.trim().parse().ok(),
            Value::Nil | Value::Array(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "(nil)"),
            Value::Int(n) => write!(f, "(integer) {}", n),
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::Status(s) => write!(f, "{}", s),
            Value::Array(items) if items.is_empty() => write!(f, "(empty array)"),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

/// Build an argument list from heterogeneous values
///
/// ```
/// use kvt_core::{args, Value};
/// assert_eq!(args!["xxx", 10], vec![Value::from("xxx"), Value::Int(10)]);
/// ```
#[macro_export]
macro_rules! args {
    () => { ::std::vec::Vec::<$crate::Value>::new() };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($arg)),+]
    };
}
