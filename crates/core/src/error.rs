// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by store clients

use thiserror::Error;

/// Error returned by a store client.
///
/// Every variant carries the store's own message and displays it verbatim.
/// Instrumentation passes these through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Application-level error reply (bad arguments, script failures)
    #[error("{0}")]
    Reply(String),
    /// Keys of a multi-key operation map to different cluster slots
    #[error("{0}")]
    CrossSlot(String),
    /// The whole batch was refused by the store
    #[error("{0}")]
    Rejected(String),
    /// Transport-level failure
    #[error("{0}")]
    Connection(String),
}

impl StoreError {
    pub fn message(&self) -> &str {
        match self {
            StoreError::Reply(m)
            | StoreError::CrossSlot(m)
            | StoreError::Rejected(m)
            | StoreError::Connection(m) => m,
        }
    }

    /// Short label for logging
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Reply(_) => "reply",
            StoreError::CrossSlot(_) => "cross_slot",
            StoreError::Rejected(_) => "rejected",
            StoreError::Connection(_) => "connection",
        }
    }

    /// Whether this is a restriction imposed by a clustered deployment
    pub fn is_cluster_rejection(&self) -> bool {
        matches!(self, StoreError::CrossSlot(_) | StoreError::Rejected(_))
    }
}
