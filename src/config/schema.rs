//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the hosting server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Shutdown behaviour.
    pub shutdown: ShutdownConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

impl ServerConfig {
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.listener.host = host.into();
        self
    }

    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.listener.port = port.into();
        self
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host or IP to bind (e.g., "0.0.0.0").
    pub host: String,

    /// Port to bind. When empty, `host` is used as the full address.
    pub port: String,
}

impl ListenerConfig {
    /// The address handed to the socket bind call.
    pub fn address(&self) -> String {
        if self.port.is_empty() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: "8080".to_string(),
        }
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Deadline used by graceful shutdown, in seconds.
    pub graceful_timeout_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            graceful_timeout_secs: 3,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "route_registrar=debug,tower_http=debug".to_string(),
        }
    }
}
