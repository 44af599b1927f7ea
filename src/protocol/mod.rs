//! Monitor line protocol.
//!
//! # Data Flow
//! ```text
//! socket bytes
//!     → line_buffer.rs (split on '\n', strip '\r', overflow check)
//!     → command.rs (case-insensitive decode)
//!     → worker.rs (dispatch, reply, connection state machine)
//! ```
//!
//! # Commands
//! | command    | reply               |
//! |------------|---------------------|
//! | HELLO      | `Hi!`               |
//! | CPU        | usage since last CPU on this connection, 2 decimals |
//! | MEM        | memory in use, 2 decimals |
//! | BYE / QUIT | `BYE`, then close   |
//! | other      | `Invalid command`   |

pub mod command;
pub mod line_buffer;
pub mod worker;

pub use command::Command;
pub use line_buffer::{LineBuffer, LineOverflow};
pub use worker::{ConnectionWorker, WorkerExit};
