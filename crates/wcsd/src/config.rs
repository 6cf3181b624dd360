//! Server configuration.
//!
//! Values are layered, lowest precedence first: built-in defaults, an
//! optional TOML file, `WCS_*` environment variables, then command-line
//! flags (applied by the binary through [`ServerConfig::with_overrides`]).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default dashboard HTTP address
pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8080";

/// Default WebSocket address
pub const DEFAULT_WS_ADDR: &str = "127.0.0.1:8081";

/// Default dashboard file, relative to the working directory
pub const DEFAULT_DASHBOARD_PATH: &str = "assets/dashboard.html";

/// Environment variable overriding `http_addr`
pub const ENV_HTTP_ADDR: &str = "WCS_HTTP_ADDR";

/// Environment variable overriding `ws_addr`
pub const ENV_WS_ADDR: &str = "WCS_WS_ADDR";

/// Environment variable overriding `dashboard_path`
pub const ENV_DASHBOARD: &str = "WCS_DASHBOARD";

/// Configuration for both endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the dashboard HTTP server binds
    pub http_addr: SocketAddr,
    /// Address the WebSocket server binds
    pub ws_addr: SocketAddr,
    /// HTML file served at `/` and `/index.html`
    pub dashboard_path: PathBuf,
    /// Largest accepted WebSocket message in bytes
    pub max_message_size: usize,
    /// Frames buffered per connection before deliveries are dropped
    pub outbox_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            ws_addr: SocketAddr::from(([127, 0, 0, 1], 8081)),
            dashboard_path: PathBuf::from(DEFAULT_DASHBOARD_PATH),
            max_message_size: 1024 * 1024, // 1 MiB
            outbox_capacity: 1024,
        }
    }
}

/// Values that take precedence over file and environment settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub http_addr: Option<String>,
    pub ws_addr: Option<String>,
    pub dashboard_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Builds the configuration from defaults, `path` (if any) and the
    /// process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())
    }

    /// Reads a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::from_toml(&text).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parses TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `WCS_*` variables looked up through `lookup`.
    pub fn apply_env<F>(self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.with_overrides(ConfigOverrides {
            http_addr: lookup(ENV_HTTP_ADDR),
            ws_addr: lookup(ENV_WS_ADDR),
            dashboard_path: lookup(ENV_DASHBOARD).map(PathBuf::from),
        })
    }

    /// Replaces every field for which `overrides` carries a value.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(addr) = overrides.http_addr {
            self.http_addr = parse_addr("http_addr", &addr)?;
        }
        if let Some(addr) = overrides.ws_addr {
            self.ws_addr = parse_addr("ws_addr", &addr)?;
        }
        if let Some(path) = overrides.dashboard_path {
            self.dashboard_path = path;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_message_size == 0 {
            return Err(ConfigError::Invalid {
                field: "max_message_size",
                value: "0".to_string(),
            });
        }
        if self.outbox_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "outbox_capacity",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_addr(field: &'static str, value: &str) -> Result<SocketAddr, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        field,
        value: value.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to read config file {}: {error}", path.display())]
    Read { path: PathBuf, error: String },

    #[error("failed to parse config file {}: {error}", path.display())]
    Parse { path: PathBuf, error: String },

    #[error("invalid value for {field}: {value:?}")]
    Invalid { field: &'static str, value: String },
}
