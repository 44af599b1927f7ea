//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, SO_REUSEADDR, backlog, accept)
//!     → server.rs (accept loop, one detached task per connection)
//!     → connection.rs (connection id, live-connection tracking)
//!     → Hand off to protocol::worker
//!
//! Connection States:
//!     Accepted → Reading ⇄ Dispatch → Closing → Released
//! ```
//!
//! # Design Decisions
//! - Accept errors are isolated; only startup failures are fatal
//! - Each connection's resources are owned by its task and dropped with it
//! - No admission control or timeouts (open hardening gap)

pub mod connection;
pub mod listener;
pub mod server;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionTracker};
pub use listener::{Listener, ListenerError};
pub use server::MonitorServer;
