//! Interceptor configuration.
//!
//! Configuration is loaded from environment variables with sensible
//! defaults; `from_vars` takes the variables as a map so tests can load
//! configuration without touching the process environment.

use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default base URL for the token-introspection service.
pub const DEFAULT_INTROSPECTION_BASE_URL: &str = "http://localhost:3000";

/// Default request timeout for introspection calls, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default connect timeout for introspection calls, in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Interceptor configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the token-introspection service.
    pub introspection_base_url: String,

    /// Request timeout for introspection calls, in seconds.
    pub request_timeout_secs: u64,

    /// Connect timeout for introspection calls, in seconds.
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid timeout configuration: {0}")]
    InvalidTimeout(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let introspection_base_url = vars
            .get("OAUTH_INTROSPECTION_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_INTROSPECTION_BASE_URL.to_string());

        let request_timeout_secs = parse_timeout(
            vars,
            "OAUTH_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;

        let connect_timeout_secs = parse_timeout(
            vars,
            "OAUTH_CONNECT_TIMEOUT_SECS",
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )?;

        Ok(Config {
            introspection_base_url,
            request_timeout_secs,
            connect_timeout_secs,
        })
    }
}

fn parse_timeout(
    vars: &HashMap<String, String>,
    name: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    let Some(value_str) = vars.get(name) else {
        return Ok(default);
    };

    let value: u64 = value_str.parse().map_err(|e| {
        ConfigError::InvalidTimeout(format!(
            "{} must be a valid positive integer, got '{}': {}",
            name, value_str, e
        ))
    })?;

    if value == 0 {
        return Err(ConfigError::InvalidTimeout(format!(
            "{} must be greater than 0",
            name
        )));
    }

    Ok(value)
}
