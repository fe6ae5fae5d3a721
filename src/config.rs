//! Resolver configuration
//!
//! Names of the fields the path-link resolver relies on, whether query
//! counters are collected, and the log threshold.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::Severity;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown log level: {0}")]
    LogLevel(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io(_) => "NODELINK_CONFIG_IO",
            ConfigError::Parse(_) => "NODELINK_CONFIG_PARSE",
            ConfigError::LogLevel(_) => "NODELINK_CONFIG_LOG_LEVEL",
        }
    }
}

/// Resolver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Type tag of file nodes (default: "File")
    #[serde(default = "default_file_node_type")]
    pub file_node_type: String,

    /// Field of a file node holding its directory (default: "dir")
    #[serde(default = "default_file_dir_field")]
    pub file_dir_field: String,

    /// Field of a file node holding its absolute path (default: "absolutePath")
    #[serde(default = "default_file_path_field")]
    pub file_path_field: String,

    /// Count store queries per request (default: true)
    #[serde(default = "default_collect_stats")]
    pub collect_stats: bool,

    /// Minimum log severity (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_file_node_type() -> String {
    "File".to_string()
}

fn default_file_dir_field() -> String {
    "dir".to_string()
}

fn default_file_path_field() -> String {
    "absolutePath".to_string()
}

fn default_collect_stats() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            file_node_type: default_file_node_type(),
            file_dir_field: default_file_dir_field(),
            file_path_field: default_file_path_field(),
            collect_stats: default_collect_stats(),
            log_level: default_log_level(),
        }
    }
}

impl ResolverConfig {
    /// Loads a JSON config file; missing keys take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: ResolverConfig = serde_json::from_str(&contents)?;
        config.log_severity()?;
        Ok(config)
    }

    /// Parsed `log_level`
    pub fn log_severity(&self) -> Result<Severity, ConfigError> {
        Severity::parse(&self.log_level).ok_or_else(|| ConfigError::LogLevel(self.log_level.clone()))
    }
}
