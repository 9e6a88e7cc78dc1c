// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kvt-core: data model for traced key-value store clients
//!
//! This crate provides:
//! - Store values and errors
//! - Command classification against a live script registry
//! - Cluster key-slot hashing
//! - TOML configuration

pub mod command;
pub mod config;
pub mod error;
pub mod slot;
pub mod value;

pub use command::{
    classify, is_restricted, Category, CommandDescriptor, KeyCount, ScriptRegistry, PIPELINE,
    RESTRICTED_COMMANDS,
};
pub use config::{Config, ConfigError};
pub use error::StoreError;
pub use slot::{key_slot, SLOT_COUNT};
pub use value::Value;
