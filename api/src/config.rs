//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::str::FromStr;

/// Default port of the relay.
pub const DEFAULT_PORT: u16 = 9090;

/// Default request body limit (1 MiB).
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("unknown log format '{other}', expected 'text' or 'json'"),
        }
    }
}

/// Server configuration.
///
/// Configuration values can be set via environment variables:
/// - `RELAY_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `RELAY_PORT`: The port to listen on (default: 9090)
/// - `RELAY_BODY_LIMIT_BYTES`: Maximum request body size (default: 1048576)
/// - `RELAY_LOG_FORMAT`: `text` or `json` (default: text)
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Maximum accepted request body size in bytes.
    pub body_limit_bytes: usize,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let host = lookup("RELAY_HOST").unwrap_or(defaults.host);

        let port = lookup("RELAY_PORT")
            .map(|p| p.parse::<u16>())
            .transpose()
            .context("RELAY_PORT must be a valid port number")?
            .unwrap_or(defaults.port);

        let body_limit_bytes = lookup("RELAY_BODY_LIMIT_BYTES")
            .map(|b| b.parse::<usize>())
            .transpose()
            .context("RELAY_BODY_LIMIT_BYTES must be a byte count")?
            .unwrap_or(defaults.body_limit_bytes);

        let log_format = lookup("RELAY_LOG_FORMAT")
            .map(|f| f.parse::<LogFormat>())
            .transpose()?
            .unwrap_or(defaults.log_format);

        Ok(Self {
            host,
            port,
            body_limit_bytes,
            log_format,
        })
    }

    /// Returns the socket address for binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the host and port do not form a valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid socket address {}:{}", self.host, self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            log_format: LogFormat::Text,
        }
    }
}
