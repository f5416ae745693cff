//! TOML configuration.
//!
//! ```toml
//! [data]
//! path = "./data/apollo-contacts-export.csv"
//!
//! [server]
//! bind = "0.0.0.0:8000"
//! cors_origins = ["http://localhost:3000"]
//!
//! [retrieval]
//! default_limit = 50
//! default_top_k = 20
//! max_limit = 500
//!
//! [logging]
//! level = "info"
//!
//! [remote_tools]
//! url = "http://127.0.0.1:7331"
//! timeout_secs = 10
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub remote_tools: Option<RemoteToolsConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// CSV export backing the contact set. A missing file loads as empty.
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Allowed CORS origins. Empty or `["*"]` allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_origins: default_cors_origins(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}
fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:3001".to_string(),
    ]
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            default_top_k: default_top_k(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_limit() -> usize {
    50
}
fn default_top_k() -> usize {
    20
}
fn default_max_limit() -> usize {
    500
}

impl RetrievalConfig {
    /// Caller-supplied limit, or the default, capped at `max_limit`.
    pub fn clamp_limit(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }

    pub fn clamp_top_k(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_top_k).min(self.max_limit)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemoteToolsConfig {
    /// Base URL of another tool server exposing `/tools/list`.
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Defaults for running without a config file.
    pub fn minimal() -> Self {
        Self {
            data: DataConfig {
                path: PathBuf::from("./data/apollo-contacts-export.csv"),
            },
            server: ServerConfig::default(),
            retrieval: RetrievalConfig::default(),
            logging: LoggingConfig::default(),
            remote_tools: None,
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    // Validate retrieval
    if config.retrieval.default_limit < 1 {
        anyhow::bail!("retrieval.default_limit must be >= 1");
    }
    if config.retrieval.default_top_k < 1 {
        anyhow::bail!("retrieval.default_top_k must be >= 1");
    }
    if config.retrieval.max_limit < config.retrieval.default_limit
        || config.retrieval.max_limit < config.retrieval.default_top_k
    {
        anyhow::bail!("retrieval.max_limit must be >= default_limit and default_top_k");
    }

    match config.logging.level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        other => anyhow::bail!(
            "Unknown logging.level: '{}'. Must be trace, debug, info, warn, or error.",
            other
        ),
    }

    if let Some(remote) = &config.remote_tools {
        if !(remote.url.starts_with("http://") || remote.url.starts_with("https://")) {
            anyhow::bail!("remote_tools.url must be an http(s) URL, got '{}'", remote.url);
        }
        if remote.timeout_secs == 0 {
            anyhow::bail!("remote_tools.timeout_secs must be > 0");
        }
    }

    Ok(())
}
