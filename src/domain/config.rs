//! # Configuration
//!
//! Manages the loading and parsing of the bot's configuration file (`config.yaml`).
//! Defines the structs for the Matrix service, router behaviour and logging sinks.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Read and parse the YAML file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Configuration for the connected chat services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub matrix: MatrixConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub username: String,
    pub password: String,
    pub homeserver: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// How inbound messages are matched against commands.
#[derive(Debug, Deserialize, Clone)]
pub struct RouterConfig {
    /// Checked in order, first match wins.
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub ignore_prefix_case: bool,
    #[serde(default)]
    pub bots_allowed: bool,
    /// Senders the gateway flags as bots.
    #[serde(default)]
    pub bot_users: Vec<String>,
    /// Stop after the first top-level command that triggers.
    #[serde(default)]
    pub first_match_only: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            prefixes: default_prefixes(),
            ignore_prefix_case: false,
            bots_allowed: false,
            bot_users: Vec::new(),
            first_match_only: false,
        }
    }
}

fn default_prefixes() -> Vec<String> {
    vec!["!".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub directory: String,
    #[serde(default = "default_log_file")]
    pub file: String,
    /// EnvFilter directives, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_log_dir(),
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

fn default_log_dir() -> String {
    "data".to_string()
}

fn default_log_file() -> String {
    "session.log".to_string()
}

fn default_log_filter() -> String {
    "info,matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn"
        .to_string()
}
