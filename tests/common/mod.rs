//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use loadmon::config::{ListenerConfig, ProtocolConfig};
use loadmon::monitor::{CpuUsageSample, SystemMonitor};
use loadmon::net::{ConnectionTracker, Listener, MonitorServer};

/// Monitor whose counters advance 40 busy ticks per 100 on each sample.
pub struct FixedLoadMonitor {
    step: AtomicU64,
}

impl FixedLoadMonitor {
    pub fn new() -> Self {
        Self {
            step: AtomicU64::new(0),
        }
    }
}

impl SystemMonitor for FixedLoadMonitor {
    fn sample(&self) -> CpuUsageSample {
        let step = self.step.fetch_add(1, Ordering::SeqCst);
        CpuUsageSample::new(step * 40, step * 100)
    }

    fn memory_percent(&self) -> f64 {
        63.126
    }
}

/// Start a monitor server on an ephemeral loopback port.
pub async fn start_server(line_capacity: usize) -> (SocketAddr, ConnectionTracker) {
    let config = ListenerConfig {
        bind_address: "127.0.0.1".into(),
        port: 0,
        ..ListenerConfig::default()
    };
    let listener = Listener::bind(&config).unwrap();
    let addr = listener.local_addr().unwrap();

    let protocol = ProtocolConfig {
        line_buffer_capacity: line_capacity,
    };
    let server = MonitorServer::new(&protocol, Arc::new(FixedLoadMonitor::new()));
    let tracker = server.tracker().clone();
    tokio::spawn(server.run(listener));

    (addr, tracker)
}

/// Line-oriented client for the monitor protocol.
pub struct Client {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Client {
    pub async fn connect(addr: SocketAddr) -> Self {
        let (read, writer) = TcpStream::connect(addr).await.unwrap().into_split();
        Self {
            reader: BufReader::new(read),
            writer,
        }
    }

    pub async fn send(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).await.unwrap();
    }

    /// Next reply line including its newline; empty once the server closed.
    pub async fn reply(&mut self) -> String {
        let mut line = String::new();
        match self.reader.read_line(&mut line).await {
            Ok(_) => line,
            // a reset after close reads the same as end of stream
            Err(_) => String::new(),
        }
    }

    pub async fn request(&mut self, command: &str) -> String {
        self.send(format!("{}\n", command).as_bytes()).await;
        self.reply().await
    }
}

/// True for replies shaped like `12.34\n`.
pub fn is_percent_line(reply: &str) -> bool {
    let Some(body) = reply.strip_suffix('\n') else {
        return false;
    };
    let Some((whole, frac)) = body.split_once('.') else {
        return false;
    };
    !whole.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && frac.len() == 2
        && frac.bytes().all(|b| b.is_ascii_digit())
}
