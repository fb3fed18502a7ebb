// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read once at startup from a JSON file and never changes
//! afterwards. The parsed [`Config`] is shared with every request through
//! [`AppState`](crate::state::AppState).
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `CONFIG_PATH` | Path of the JSON configuration file | `config.json` |
//! | `HOST` | Server bind address (overrides `host`) | `0.0.0.0` |
//! | `PORT` | Server bind port (overrides `http_service_port`) | from file |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! ## File Format
//!
//! ```json
//! {
//!   "http_service_port": 8080,
//!   "platform_url": "platform.example.com",
//!   "interface_hashinfo": "api/hashinfo",
//!   "interface_login": "api/login",
//!   "interface_register": "api/register",
//!   "interface_gameinfo": "api/gameinfo",
//!   "interface_balance": "api/balance"
//! }
//! ```

use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use url::Url;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
/// Environment variable overriding the bind host.
pub const HOST_ENV: &str = "HOST";
/// Environment variable overriding the bind port.
pub const PORT_ENV: &str = "PORT";
/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_CROSSDOMAIN_PATH: &str = "crossdomain.xml";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Service configuration, immutable after startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    pub http_service_port: u16,

    /// Platform base URL. A bare `host[:port]` is treated as `http://host[:port]`.
    pub platform_url: String,
    pub interface_hashinfo: String,
    pub interface_login: String,
    pub interface_register: String,
    pub interface_gameinfo: String,
    pub interface_balance: String,

    /// Per-call timeout for platform requests.
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,

    /// Render failures with HTTP status codes and a JSON body instead of the
    /// legacy `200 error: <message>` text.
    #[serde(default)]
    pub structured_errors: bool,

    #[serde(default = "default_crossdomain_path")]
    pub crossdomain_path: PathBuf,

    #[serde(default)]
    pub tls_cert_path: Option<PathBuf>,
    #[serde(default)]
    pub tls_key_path: Option<PathBuf>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    DEFAULT_UPSTREAM_TIMEOUT_SECS
}

fn default_crossdomain_path() -> PathBuf {
    PathBuf::from(DEFAULT_CROSSDOMAIN_PATH)
}

impl Config {
    /// Load the file named by `CONFIG_PATH` (or `config.json`) and apply
    /// `HOST` / `PORT` overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = env_or_default(CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH);
        let mut config = Self::load(&path)?;

        if let Some(host) = env_optional(HOST_ENV) {
            config.host = host;
        }
        if let Some(port) = env_optional(PORT_ENV) {
            config.http_service_port = port
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("{PORT_ENV}={port}: {e}")))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&data)
    }

    pub fn from_slice(data: &[u8]) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every platform endpoint resolves to a usable URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoints = PlatformEndpoints::from_config(self)?;
        endpoints.game_info("probe")?;

        if self.upstream_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "upstream_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.tls_cert_path.is_some() != self.tls_key_path.is_some() {
            return Err(ConfigError::Invalid(
                "tls_cert_path and tls_key_path must be set together".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.http_service_port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("bind address: {e}")))
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        CONNECT_TIMEOUT.min(self.upstream_timeout())
    }

    pub fn tls_paths(&self) -> Option<(&Path, &Path)> {
        match (&self.tls_cert_path, &self.tls_key_path) {
            (Some(cert), Some(key)) => Some((cert.as_path(), key.as_path())),
            _ => None,
        }
    }
}

/// Absolute URLs of the platform interfaces, resolved from [`Config`].
#[derive(Debug, Clone)]
pub struct PlatformEndpoints {
    pub hash_info: Url,
    pub login: Url,
    pub register: Url,
    game_info: Url,
    pub balance: Url,
}

impl PlatformEndpoints {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let base = platform_base(&config.platform_url);
        Ok(Self {
            hash_info: join(&base, &config.interface_hashinfo)?,
            login: join(&base, &config.interface_login)?,
            register: join(&base, &config.interface_register)?,
            game_info: join(&base, &config.interface_gameinfo)?,
            balance: join(&base, &config.interface_balance)?,
        })
    }

    /// Game info URL with `app_id` appended as its own path segment.
    pub fn game_info(&self, app_id: &str) -> Result<Url, ConfigError> {
        let mut url = self.game_info.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ConfigError::Invalid(format!("game info URL cannot take a path: {}", self.game_info))
            })?
            .pop_if_empty()
            .push(app_id);
        Ok(url)
    }
}

fn platform_base(platform_url: &str) -> String {
    let trimmed = platform_url.trim().trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

fn join(base: &str, path: &str) -> Result<Url, ConfigError> {
    let raw = format!("{base}/{}", path.trim().trim_start_matches('/'));
    Url::parse(&raw).map_err(|e| ConfigError::Invalid(format!("{raw}: {e}")))
}

fn env_optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}
