use std::io::ErrorKind;

use serde::Deserialize;
use thiserror::Error;

fn default_port() -> u16 {
    8080
}

fn default_base_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_timeout_ms() -> u64 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("irradiance.timeout_ms must be greater than zero")]
    ZeroTimeout,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub irradiance: IrradianceConfig,
    #[serde(default)]
    pub offline_mode: bool,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub lead_store: LeadStoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served for every path outside `/api`
    #[serde(default)]
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port(), static_dir: None }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct IrradianceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Provider call budget before falling back to the latitude band
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for IrradianceConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), timeout_ms: default_timeout_ms() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LeadStoreConfig {
    /// Collection endpoint of the document store; in-memory when absent
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content)?;
        if config.irradiance.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    /// The flag tells the caller whether the file was found.
    pub fn load_or_default(path: &str) -> Result<(Self, bool), ConfigError> {
        match Self::load(path) {
            Ok(c) => Ok((c, true)),
            Err(ConfigError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok((Self::default(), false)),
            Err(e) => Err(e),
        }
    }
}
