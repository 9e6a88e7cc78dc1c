// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration
//!
//! Loaded from TOML. Every section is optional:
//!
//! ```toml
//! [log]
//! filter = "kvt=debug"
//!
//! [cluster]
//! nodes = 3
//!
//! [[scripts]]
//! name = "echoKeys"
//! keys = 2          # or "dynamic"
//! ```

use crate::command::{KeyCount, ScriptRegistry};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default `EnvFilter` directive when neither config nor environment set one
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default number of nodes in a clustered deployment
pub const DEFAULT_CLUSTER_NODES: usize = 3;

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,
    /// Present when the store is clustered
    #[serde(default)]
    pub cluster: Option<ClusterConfig>,
    /// Scripts registered before replay starts
    #[serde(default)]
    pub scripts: Vec<ScriptConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    #[serde(default = "default_cluster_nodes")]
    pub nodes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptConfig {
    pub name: String,
    pub keys: KeyCount,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

fn default_cluster_nodes() -> usize {
    DEFAULT_CLUSTER_NODES
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            nodes: default_cluster_nodes(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(cluster) = &self.cluster {
            if cluster.nodes == 0 {
                return Err(ConfigError::Invalid(
                    "cluster.nodes must be at least 1".to_string(),
                ));
            }
        }
        for script in &self.scripts {
            if script.name.trim().is_empty() {
                return Err(ConfigError::Invalid("script name is empty".to_string()));
            }
        }
        Ok(())
    }

    /// Register the configured scripts
    pub fn register_scripts(&self, registry: &ScriptRegistry) {
        for script in &self.scripts {
            registry.define(script.name.clone(), script.keys);
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
