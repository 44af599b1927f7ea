//! loadmon: host monitoring agent and target URL pool.
//!
//! # Architecture Overview
//!
//! ```text
//!   client ──TCP──▶ net::Listener ──▶ net::MonitorServer ──spawn──▶ protocol::ConnectionWorker
//!                                                                     │  LineBuffer
//!                                                                     │  Command dispatch
//!                                                                     ▼
//!                                                               monitor::SystemMonitor
//!
//!   load generator ──▶ pool::PoolLoader ──▶ pool::UrlPool (immutable, shared)
//!                                              │
//!                     per request ────────────▶ pool::selector (next_url / next_address)
//! ```
//!
//! Cross-cutting: `config` (TOML + validation), `observability` (tracing,
//! metrics).

pub mod config;
pub mod monitor;
pub mod net;
pub mod observability;
pub mod pool;
pub mod protocol;

pub use config::MonitorConfig;
pub use net::MonitorServer;
pub use pool::{PoolLoader, UrlPool};
