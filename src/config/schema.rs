//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the agent.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the monitoring agent.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Listener configuration (bind address, port, backlog).
    pub listener: ListenerConfig,

    /// Line protocol settings.
    pub protocol: ProtocolConfig,

    /// URL pool loading settings.
    pub pool: PoolConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address without port (e.g., "0.0.0.0").
    pub bind_address: String,

    /// TCP port. Overridden by the command line.
    pub port: u16,

    /// Listen backlog.
    pub backlog: u32,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 10001,
            backlog: 8,
        }
    }
}

/// Line protocol configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Per-connection line buffer size in bytes. A command line that does
    /// not fit aborts the connection.
    pub line_buffer_capacity: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            line_buffer_capacity: 128,
        }
    }
}

/// Address family used when resolving pool hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    #[default]
    Ipv4,
    Ipv6,
    Any,
}

impl AddressFamily {
    /// Whether an address belongs to this family.
    pub fn matches(&self, addr: &std::net::SocketAddr) -> bool {
        match self {
            AddressFamily::Ipv4 => addr.is_ipv4(),
            AddressFamily::Ipv6 => addr.is_ipv6(),
            AddressFamily::Any => true,
        }
    }
}

impl std::str::FromStr for AddressFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ipv4" | "inet" => Ok(AddressFamily::Ipv4),
            "ipv6" | "inet6" => Ok(AddressFamily::Ipv6),
            "any" => Ok(AddressFamily::Any),
            other => Err(format!("unknown address family: {}", other)),
        }
    }
}

/// URL pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Read buffer for URL list files; also the longest accepted URL line.
    pub file_buffer_capacity: usize,

    /// Address family to keep from DNS results.
    pub address_family: AddressFamily,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            file_buffer_capacity: 8192,
            address_family: AddressFamily::Ipv4,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
