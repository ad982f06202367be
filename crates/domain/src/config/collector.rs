use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use super::errors::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Tcp,
    Unix,
}

/// Where a collector accepts dnstap senders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenEndpoint {
    Tcp(SocketAddr),
    Unix(PathBuf),
}

impl fmt::Display for ListenEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenEndpoint::Tcp(addr) => write!(f, "tcp://{}", addr),
            ListenEndpoint::Unix(path) => write!(f, "unix://{}", path.display()),
        }
    }
}

/// One `[[collectors]]` entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectorConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub transport: TransportKind,

    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sock_path: Option<PathBuf>,

    #[serde(default = "default_correlation_ttl_secs")]
    pub correlation_ttl_secs: u64,

    /// Capacity of the ingestion queue shared by all sessions.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    #[serde(default = "default_max_frame_size")]
    pub max_frame_size: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            transport: TransportKind::default(),
            listen_address: default_listen_address(),
            listen_port: default_listen_port(),
            sock_path: None,
            correlation_ttl_secs: default_correlation_ttl_secs(),
            queue_capacity: default_queue_capacity(),
            max_frame_size: default_max_frame_size(),
        }
    }
}

impl CollectorConfig {
    pub fn tcp(name: impl Into<String>, listen_address: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            transport: TransportKind::Tcp,
            listen_address: listen_address.into(),
            listen_port: port,
            ..Self::default()
        }
    }

    pub fn unix(name: impl Into<String>, sock_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            transport: TransportKind::Unix,
            sock_path: Some(sock_path.into()),
            ..Self::default()
        }
    }

    pub fn correlation_ttl(&self) -> Duration {
        Duration::from_secs(self.correlation_ttl_secs)
    }

    pub fn listen_endpoint(&self) -> Result<ListenEndpoint, ConfigError> {
        match self.transport {
            TransportKind::Tcp => {
                let ip: IpAddr = self.listen_address.parse().map_err(|_| {
                    self.invalid(format!("invalid listen_address '{}'", self.listen_address))
                })?;
                Ok(ListenEndpoint::Tcp(SocketAddr::new(ip, self.listen_port)))
            }
            TransportKind::Unix => self
                .sock_path
                .clone()
                .map(ListenEndpoint::Unix)
                .ok_or_else(|| self.invalid("unix transport requires sock_path")),
        }
    }

    /// Port 0 is allowed here so tests can bind an ephemeral port; the
    /// file-level validation in `Config::validate` rejects it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Collector name cannot be empty".to_string(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(self.invalid("queue_capacity must be greater than 0"));
        }
        if self.correlation_ttl_secs == 0 {
            return Err(self.invalid("correlation_ttl_secs must be greater than 0"));
        }
        if self.max_frame_size == 0 {
            return Err(self.invalid("max_frame_size must be greater than 0"));
        }
        self.listen_endpoint().map(|_| ())
    }

    fn invalid(&self, reason: impl Into<String>) -> ConfigError {
        ConfigError::InvalidCollector {
            name: self.name.clone(),
            reason: reason.into(),
        }
    }
}

fn default_name() -> String {
    "dnstap".to_string()
}

fn default_listen_address() -> String {
    "0.0.0.0".to_string()
}

fn default_listen_port() -> u16 {
    6000
}

fn default_correlation_ttl_secs() -> u64 {
    10
}

fn default_queue_capacity() -> usize {
    512
}

fn default_max_frame_size() -> usize {
    1024 * 1024
}
