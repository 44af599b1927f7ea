//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (buffer sizes, backlog, addresses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::{IpAddr, SocketAddr};
use thiserror::Error;

use crate::config::schema::MonitorConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not an IP address")]
    BindAddress(String),

    #[error("listener.backlog must be at least 1")]
    Backlog,

    #[error("protocol.line_buffer_capacity must be at least 2 bytes, got {0}")]
    LineBuffer(usize),

    #[error("pool.file_buffer_capacity must be at least 16 bytes, got {0}")]
    FileBuffer(usize),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),
}

/// Check a configuration for values serde cannot reject on its own.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.listener.backlog == 0 {
        errors.push(ValidationError::Backlog);
    }
    // a line needs room for at least one byte and its delimiter
    if config.protocol.line_buffer_capacity < 2 {
        errors.push(ValidationError::LineBuffer(config.protocol.line_buffer_capacity));
    }
    if config.pool.file_buffer_capacity < 16 {
        errors.push(ValidationError::FileBuffer(config.pool.file_buffer_capacity));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
