// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command classification
//!
//! Decides how a command name is traced:
//! - restricted commands are never traced
//! - `pipeline` starts a batch
//! - names registered in the live [`ScriptRegistry`] are scripts
//! - everything else is an ordinary command

use crate::value::Value;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

/// Name of the batch-control command
pub const PIPELINE: &str = "pipeline";

/// Connectivity and administrative commands excluded from tracing
pub const RESTRICTED_COMMANDS: &[&str] = &["ping", "echo", "quit", "auth", "select"];

/// How many leading arguments of a script invocation are keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "KeyCountRepr")]
pub enum KeyCount {
    Fixed(usize),
    /// The first argument carries the key count at call time
    Dynamic,
}

impl KeyCount {
    /// Split script arguments into `(keys, argv)`.
    ///
    /// Returns `None` when a dynamic count is missing, not an integer, or
    /// larger than the number of remaining arguments.
    pub fn split<'a>(&self, args: &'a [Value]) -> Option<(&'a [Value], &'a [Value])> {
        match self {
            KeyCount::Fixed(n) => {
                let n = (*n).min(args.len());
                Some(args.split_at(n))
            }
            KeyCount::Dynamic => {
                let (count, rest) = args.split_first()?;
                let n = usize::try_from(count.as_int()?).ok()?;
                (n <= rest.len()).then(|| rest.split_at(n))
            }
        }
    }
}

impl fmt::Display for KeyCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCount::Fixed(n) => write!(f, "{}", n),
            KeyCount::Dynamic => write!(f, "dynamic"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeyCountRepr {
    Fixed(usize),
    Named(String),
}

impl TryFrom<KeyCountRepr> for KeyCount {
    type Error = String;

    fn try_from(repr: KeyCountRepr) -> Result<Self, Self::Error> {
        match repr {
            KeyCountRepr::Fixed(n) => Ok(KeyCount::Fixed(n)),
            KeyCountRepr::Named(s) => s.parse(),
        }
    }
}

impl std::str::FromStr for KeyCount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("dynamic") {
            return Ok(KeyCount::Dynamic);
        }
        s.parse::<usize>()
            .map(KeyCount::Fixed)
            .map_err(|_| format!("invalid key count: {} (expected a number or \"dynamic\")", s))
    }
}

/// Trace category of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Restricted,
    BatchControl,
    Command,
    Script(KeyCount),
}

impl Category {
    pub fn is_traced(&self) -> bool {
        !matches!(self, Category::Restricted)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Restricted => write!(f, "restricted"),
            Category::BatchControl => write!(f, "batch-control"),
            Category::Command => write!(f, "command"),
            Category::Script(keys) => write!(f, "script (keys: {})", keys),
        }
    }
}

/// A command name with its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub name: String,
    pub category: Category,
}

impl CommandDescriptor {
    /// Keys of a script invocation, if this is a script and the args carry them
    pub fn script_keys<'a>(&self, args: &'a [Value]) -> Option<&'a [Value]> {
        match self.category {
            Category::Script(count) => count.split(args).map(|(keys, _)| keys),
            _ => None,
        }
    }
}

/// Live registry of named scripts (custom commands).
///
/// Clones share the same registry, so scripts defined on a store after it
/// was instrumented are seen by the next classification.
#[derive(Debug, Clone, Default)]
pub struct ScriptRegistry {
    scripts: Arc<RwLock<HashMap<String, KeyCount>>>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a script
    pub fn define(&self, name: impl Into<String>, keys: KeyCount) {
        self.scripts
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.into(), keys);
    }

    pub fn undefine(&self, name: &str) -> Option<KeyCount> {
        self.scripts
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(name)
    }

    pub fn get(&self, name: &str) -> Option<KeyCount> {
        self.scripts
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names of all registered scripts, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .scripts
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

pub fn is_restricted(name: &str) -> bool {
    RESTRICTED_COMMANDS
        .iter()
        .any(|r| r.eq_ignore_ascii_case(name))
}

/// Classify a command name against the live script registry
pub fn classify(name: &str, scripts: &ScriptRegistry) -> CommandDescriptor {
    let category = if is_restricted(name) {
        Category::Restricted
    } else if name.eq_ignore_ascii_case(PIPELINE) {
        Category::BatchControl
    } else if let Some(keys) = scripts.get(name) {
        Category::Script(keys)
    } else {
        Category::Command
    };

    CommandDescriptor {
        name: name.to_string(),
        category,
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
