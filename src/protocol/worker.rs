//! Per-connection protocol worker.
//!
//! # State Machine
//! ```text
//! Reading ──line──▶ Dispatch ──reply──▶ Reading
//!    │                 │
//!    │ EOF / error     │ BYE, QUIT
//!    │ overflow        ▼
//!    └──────────────▶ Closing
//! ```
//!
//! Closing shuts down the write side only. The read side closes when the
//! worker, and with it the stream, is dropped.
//!
//! The worker owns its stream, line buffer and CPU baseline outright; nothing
//! here is shared with other connections. Monitor reads block on file I/O, so
//! they run on tokio's blocking pool.

use std::borrow::Cow;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::monitor::{CpuUsageSample, SystemMonitor};
use crate::net::connection::ConnectionId;
use crate::observability::metrics;
use crate::protocol::command::{format_percent, Command};
use crate::protocol::line_buffer::LineBuffer;

/// Why a worker stopped serving its connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// Client sent BYE or QUIT.
    Bye,
    /// Client closed its side.
    Eof,
    /// Reading from the socket failed.
    ReadError,
    /// Writing a reply failed.
    WriteError,
    /// A line did not fit in the buffer.
    Overflow,
}

impl WorkerExit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerExit::Bye => "bye",
            WorkerExit::Eof => "eof",
            WorkerExit::ReadError => "read_error",
            WorkerExit::WriteError => "write_error",
            WorkerExit::Overflow => "overflow",
        }
    }
}

impl std::fmt::Display for WorkerExit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Reply {
    body: Cow<'static, str>,
    close: bool,
}

impl Reply {
    fn open(body: impl Into<Cow<'static, str>>) -> Self {
        Self {
            body: body.into(),
            close: false,
        }
    }
}

/// Serves the monitor protocol on one stream.
pub struct ConnectionWorker<S> {
    id: ConnectionId,
    stream: S,
    buffer: LineBuffer,
    monitor: Arc<dyn SystemMonitor>,
    last_cpu: CpuUsageSample,
}

impl<S> ConnectionWorker<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a worker. The CPU baseline is taken once `run` starts.
    pub fn new(
        id: ConnectionId,
        stream: S,
        monitor: Arc<dyn SystemMonitor>,
        line_capacity: usize,
    ) -> Self {
        Self {
            id,
            stream,
            buffer: LineBuffer::with_capacity(line_capacity),
            monitor,
            last_cpu: CpuUsageSample::default(),
        }
    }

    /// Serve until the connection ends, then close it.
    pub async fn run(mut self) -> WorkerExit {
        self.last_cpu = self.sample_cpu().await;
        let exit = self.serve().await;

        if let Err(e) = self.stream.shutdown().await {
            tracing::trace!(connection_id = %self.id, error = %e, "Shutdown failed");
        }
        exit
    }

    async fn serve(&mut self) -> WorkerExit {
        loop {
            let n = match self.stream.read(self.buffer.spare_mut()).await {
                Ok(0) => return WorkerExit::Eof,
                Ok(n) => n,
                Err(e) => {
                    tracing::debug!(connection_id = %self.id, error = %e, "Read failed");
                    return WorkerExit::ReadError;
                }
            };
            self.buffer.advance(n);

            loop {
                let command = match self.buffer.next_line() {
                    Some(line) => Command::parse(line),
                    None => break,
                };

                let reply = self.dispatch(command).await;
                if let Err(e) = self.stream.write_all(reply.body.as_bytes()).await {
                    tracing::debug!(connection_id = %self.id, error = %e, "Write failed");
                    return WorkerExit::WriteError;
                }
                if reply.close {
                    return WorkerExit::Bye;
                }
            }

            if let Err(e) = self.buffer.compact() {
                tracing::warn!(connection_id = %self.id, error = %e, "Aborting connection");
                return WorkerExit::Overflow;
            }
        }
    }

    async fn sample_cpu(&self) -> CpuUsageSample {
        let monitor = Arc::clone(&self.monitor);
        match tokio::task::spawn_blocking(move || monitor.sample()).await {
            Ok(sample) => sample,
            Err(e) => {
                tracing::warn!(connection_id = %self.id, error = %e, "CPU sample failed");
                self.last_cpu
            }
        }
    }

    async fn memory_percent(&self) -> f64 {
        let monitor = Arc::clone(&self.monitor);
        match tokio::task::spawn_blocking(move || monitor.memory_percent()).await {
            Ok(pct) => pct,
            Err(e) => {
                tracing::warn!(connection_id = %self.id, error = %e, "Memory sample failed");
                0.0
            }
        }
    }

    async fn dispatch(&mut self, command: Command) -> Reply {
        tracing::trace!(connection_id = %self.id, command = command.as_str(), "Command received");
        metrics::record_command(command.as_str());

        match command {
            Command::Hello => Reply::open("Hi!\n"),
            Command::Cpu => {
                let now = self.sample_cpu().await;
                let usage = now.usage_since(&self.last_cpu);
                self.last_cpu = now;
                Reply::open(format_percent(usage))
            }
            Command::Mem => Reply::open(format_percent(self.memory_percent().await)),
            Command::Bye => Reply {
                body: Cow::Borrowed("BYE\n"),
                close: true,
            },
            Command::Invalid => Reply::open("Invalid command\n"),
        }
    }
}
