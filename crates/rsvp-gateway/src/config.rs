//! Gateway configuration
//!
//! Defaults come from `rsvp_core::branding`; every field can be overridden by
//! an `RSVP_*` environment variable.
//!
//! | Variable                        | Field                      |
//! |---------------------------------|----------------------------|
//! | `RSVP_HOST`                     | `host`                     |
//! | `RSVP_PORT`                     | `port`                     |
//! | `RSVP_ENABLE_CORS`              | `enable_cors`              |
//! | `RSVP_DATABASE_PATH`            | `database_path`            |
//! | `RSVP_DIRECTORY_URL`            | `directory_url`            |
//! | `RSVP_POLICY_URL`               | `policy_url`               |
//! | `RSVP_UPSTREAM_TIMEOUT_MS`      | `upstream.timeout`         |
//! | `RSVP_UPSTREAM_MAX_ATTEMPTS`    | `upstream.max_attempts`    |
//! | `RSVP_UPSTREAM_BACKOFF_MS`      | `upstream.initial_backoff` |
//! | `RSVP_UPSTREAM_MAX_BACKOFF_MS`  | `upstream.max_backoff`     |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rsvp_core::{branding, UpstreamPolicy};
use thiserror::Error;

/// Invalid configuration value
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    InvalidValue {
        var: String,
        value: String,
        reason: String,
    },

    #[error("{0} is not a valid listen address")]
    InvalidAddress(String),
}

/// Gateway server configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS for browser access
    pub enable_cors: bool,
    /// SQLite file; `None` means the platform default
    pub database_path: Option<PathBuf>,
    /// Store-directory service base URL
    pub directory_url: String,
    /// Reservation-policy service base URL
    pub policy_url: String,
    /// Timeout and retry for outbound calls
    pub upstream: UpstreamPolicy,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: branding::DEFAULT_GATEWAY_PORT,
            enable_cors: true,
            database_path: None,
            directory_url: branding::DEFAULT_DIRECTORY_URL.to_string(),
            policy_url: branding::DEFAULT_POLICY_URL.to_string(),
            upstream: UpstreamPolicy::default(),
        }
    }
}

impl GatewayConfig {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `RSVP_*` name
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| -> Option<(String, String)> {
            let var = branding::env_var(name);
            lookup(&var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|v| (var, v))
        };

        let mut config = Self::default();

        if let Some((_, host)) = get("HOST") {
            config.host = host;
        }
        if let Some((var, value)) = get("PORT") {
            config.port = parse(&var, &value)?;
        }
        if let Some((var, value)) = get("ENABLE_CORS") {
            config.enable_cors = parse_bool(&var, &value)?;
        }
        if let Some((_, path)) = get("DATABASE_PATH") {
            config.database_path = Some(PathBuf::from(path));
        }
        if let Some((_, url)) = get("DIRECTORY_URL") {
            config.directory_url = url;
        }
        if let Some((_, url)) = get("POLICY_URL") {
            config.policy_url = url;
        }
        if let Some((var, value)) = get("UPSTREAM_TIMEOUT_MS") {
            config.upstream.timeout = parse_millis(&var, &value)?;
        }
        if let Some((var, value)) = get("UPSTREAM_MAX_ATTEMPTS") {
            let attempts: u32 = parse(&var, &value)?;
            if attempts == 0 {
                return Err(invalid(&var, &value, "must be at least 1"));
            }
            config.upstream.max_attempts = attempts;
        }
        if let Some((var, value)) = get("UPSTREAM_BACKOFF_MS") {
            config.upstream.initial_backoff = parse_millis(&var, &value)?;
        }
        if let Some((var, value)) = get("UPSTREAM_MAX_BACKOFF_MS") {
            config.upstream.max_backoff = parse_millis(&var, &value)?;
        }

        Ok(config)
    }

    /// Get the socket address
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::InvalidAddress(raw))
    }
}

fn invalid(var: &str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        var: var.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| invalid(var, value, e.to_string()))
}

fn parse_millis(var: &str, value: &str) -> Result<Duration, ConfigError> {
    let millis: u64 = parse(var, value)?;
    if millis == 0 {
        return Err(invalid(var, value, "must be greater than zero"));
    }
    Ok(Duration::from_millis(millis))
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(var, value, "expected true or false")),
    }
}
