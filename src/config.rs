//! Configuration loading and management.
//!
//! Everything has a serde default, so a partial file (or no file at all)
//! yields the documented defaults: listen on `127.0.0.1:6667`, 60 second
//! registration window, keepalive PING every 180 seconds with a 60 second
//! PONG deadline.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server identity.
    #[serde(default)]
    pub server: ServerConfig,
    /// Network listen configuration.
    #[serde(default)]
    pub listen: ListenConfig,
    /// Registration and keepalive timeouts.
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Startup validation.
    ///
    /// The keepalive window ordering is a configuration invariant, not a
    /// runtime check: a timeout at or above the period would schedule the
    /// next PING before the previous one's window has elapsed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeouts.ping_timeout >= self.timeouts.ping_period {
            return Err(ConfigError::Invalid(format!(
                "timeouts.ping_timeout ({}) must be less than timeouts.ping_period ({})",
                self.timeouts.ping_timeout, self.timeouts.ping_period
            )));
        }
        Ok(())
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name carried in reply prefixes (truncated to 63 chars).
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

/// Network listen configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address the acceptor binds to.
    #[serde(default = "default_listen_address")]
    pub address: SocketAddr,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: default_listen_address(),
        }
    }
}

/// Timeouts for the registration handshake and the keepalive loop.
///
/// The server sends periodic PING messages to detect dead connections;
/// a client that does not answer within `ping_timeout` is disconnected
/// with "Ping timeout".
#[derive(Debug, Clone, Deserialize)]
pub struct TimeoutsConfig {
    /// Seconds allowed for the NICK/USER handshake before disconnect (default: 60).
    #[serde(default = "default_registration_timeout")]
    pub registration: u64,

    /// Seconds between keepalive PINGs (default: 180).
    #[serde(default = "default_ping_period")]
    pub ping_period: u64,

    /// Seconds to wait for PONG after a PING before disconnect (default: 60).
    /// Must be strictly less than `ping_period`.
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            registration: default_registration_timeout(),
            ping_period: default_ping_period(),
            ping_timeout: default_ping_timeout(),
        }
    }
}

fn default_server_name() -> String {
    "minnow.local".to_string()
}

fn default_listen_address() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 6667))
}

fn default_registration_timeout() -> u64 {
    60
}

fn default_ping_period() -> u64 {
    180
}

fn default_ping_timeout() -> u64 {
    60
}
