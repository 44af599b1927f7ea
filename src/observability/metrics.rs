//! Metrics collection and exposition.
//!
//! # Metrics
//! - `loadmon_connections_total` (counter): accepted connections
//! - `loadmon_active_connections` (gauge): connections with a live worker
//! - `loadmon_accept_errors_total` (counter): failed accepts
//! - `loadmon_commands_total` (counter): commands by `command`
//! - `loadmon_connection_exits_total` (counter): worker exits by `reason`

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint. Must run inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_connection_opened() {
    metrics::counter!("loadmon_connections_total").increment(1);
    metrics::gauge!("loadmon_active_connections").increment(1.0);
}

pub fn record_connection_released() {
    metrics::gauge!("loadmon_active_connections").decrement(1.0);
}

pub fn record_connection_exit(reason: &'static str) {
    metrics::counter!("loadmon_connection_exits_total", "reason" => reason).increment(1);
}

pub fn record_accept_error() {
    metrics::counter!("loadmon_accept_errors_total").increment(1);
}

pub fn record_command(command: &'static str) {
    metrics::counter!("loadmon_commands_total", "command" => command).increment(1);
}
