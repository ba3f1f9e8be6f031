use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub engine: EngineConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Base URL of the engine, e.g. `https://localhost:9200`.
    pub url: String,
    #[serde(default = "default_index")]
    pub index: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Accept self-signed certificates from the engine. Common for local
    /// Elasticsearch clusters with auto-generated TLS.
    #[serde(default)]
    pub insecure: bool,
}

fn default_index() -> String {
    "ebooks".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.engine.url.trim().is_empty() {
        anyhow::bail!("engine.url must not be empty");
    }

    if config.engine.index.trim().is_empty() {
        anyhow::bail!("engine.index must not be empty");
    }

    if config.engine.timeout_secs == 0 {
        anyhow::bail!("engine.timeout_secs must be > 0");
    }

    if config.engine.username.is_some() != config.engine.password.is_some() {
        anyhow::bail!("engine.username and engine.password must be set together");
    }

    Ok(config)
}
