//! Tax API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Tax API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind
    pub bind_addr: IpAddr,

    /// HTTP port
    pub port: u16,

    /// Rule file loaded at startup and on reload
    pub rules_path: PathBuf,

    /// Whether `POST /api/rules/reload` is served
    pub allow_reload: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            bind_addr: IpAddr::from([0, 0, 0, 0]),
            port: 8000,
            rules_path: PathBuf::from("cess_rules.json"),
            allow_reload: true,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ApiConfig::default();

        let config = ApiConfig {
            bind_addr: match get("TAX_API_BIND_ADDR") {
                Some(v) => v
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("TAX_API_BIND_ADDR".to_string()))?,
                None => defaults.bind_addr,
            },

            port: match get("TAX_API_PORT") {
                Some(v) => v
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("TAX_API_PORT".to_string()))?,
                None => defaults.port,
            },

            rules_path: get("CESS_RULES_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.rules_path),

            allow_reload: match get("TAX_API_ALLOW_RELOAD") {
                Some(v) => parse_bool(&v)
                    .ok_or_else(|| ConfigError::InvalidValue("TAX_API_ALLOW_RELOAD".to_string()))?,
                None => defaults.allow_reload,
            },
        };

        if config.rules_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("CESS_RULES_PATH".to_string()));
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
