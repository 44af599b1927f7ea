//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → MonitorConfig (validated, immutable)
//!     → command line overrides (port)
//!     → handed to listener, server and pool loader
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults so the agent runs without a file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AddressFamily;
pub use schema::ListenerConfig;
pub use schema::MonitorConfig;
pub use schema::ObservabilityConfig;
pub use schema::PoolConfig;
pub use schema::ProtocolConfig;
