//! Accept loop for the monitor agent.
//!
//! # Responsibilities
//! - Accept connections forever
//! - Give each connection its own detached worker task and tracking guard
//! - Keep accept failures local: log and continue
//!
//! No shutdown path, read timeout or connection cap exists; a client holds
//! its task for as long as it keeps the socket open.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

use crate::config::ProtocolConfig;
use crate::monitor::SystemMonitor;
use crate::net::connection::ConnectionTracker;
use crate::net::listener::Listener;
use crate::observability::metrics;
use crate::protocol::worker::{ConnectionWorker, WorkerExit};

/// Serves the monitor protocol to every accepted connection.
pub struct MonitorServer {
    monitor: Arc<dyn SystemMonitor>,
    line_capacity: usize,
    tracker: ConnectionTracker,
}

impl MonitorServer {
    pub fn new(config: &ProtocolConfig, monitor: Arc<dyn SystemMonitor>) -> Self {
        Self {
            monitor,
            line_capacity: config.line_buffer_capacity,
            tracker: ConnectionTracker::new(),
        }
    }

    /// Live connection count.
    pub fn tracker(&self) -> &ConnectionTracker {
        &self.tracker
    }

    /// Run the accept loop. Never returns.
    pub async fn run(self, listener: Listener) {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(address = %addr, "Monitor server accepting connections");
        }

        loop {
            match listener.accept().await {
                Ok((stream, peer_addr)) => {
                    self.spawn_worker(stream, peer_addr);
                }
                Err(e) => {
                    metrics::record_accept_error();
                    tracing::error!(error = %e, "Error accepting client socket");
                }
            }
        }
    }

    /// Start a detached worker for one accepted connection.
    ///
    /// Only tracking happens on the caller's task; the worker is built and
    /// takes its CPU baseline inside the spawned task.
    pub fn spawn_worker(&self, stream: TcpStream, peer_addr: SocketAddr) -> JoinHandle<WorkerExit> {
        let guard = self.tracker.track();
        let monitor = Arc::clone(&self.monitor);
        let line_capacity = self.line_capacity;

        tracing::debug!(
            connection_id = %guard.id(),
            peer_addr = %peer_addr,
            active = self.tracker.active_count(),
            "Worker started"
        );

        tokio::spawn(async move {
            let worker = ConnectionWorker::new(guard.id(), stream, monitor, line_capacity);
            let exit = worker.run().await;
            metrics::record_connection_exit(exit.as_str());
            tracing::debug!(
                connection_id = %guard.id(),
                peer_addr = %peer_addr,
                exit = %exit,
                "Connection closed"
            );
            // the guard drops with the task, after the socket is closed
            drop(guard);
            exit
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::CpuUsageSample;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::net::TcpListener;

    #[derive(Default)]
    struct IdleMonitor {
        samples: AtomicUsize,
    }

    impl SystemMonitor for IdleMonitor {
        fn sample(&self) -> CpuUsageSample {
            self.samples.fetch_add(1, Ordering::SeqCst);
            CpuUsageSample::default()
        }

        fn memory_percent(&self) -> f64 {
            10.0
        }
    }

    #[tokio::test]
    async fn worker_releases_tracking_on_exit() {
        let server = MonitorServer::new(&ProtocolConfig::default(), Arc::new(IdleMonitor::default()));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut client = TcpStream::connect(addr).await.unwrap();
        let (stream, peer) = listener.accept().await.unwrap();

        let handle = server.spawn_worker(stream, peer);
        assert_eq!(server.tracker().active_count(), 1);

        client.write_all(b"MEM\nBYE\n").await.unwrap();
        let mut reply = String::new();
        client.read_to_string(&mut reply).await.unwrap();
        assert_eq!(reply, "10.00\nBYE\n");

        assert_eq!(handle.await.unwrap(), WorkerExit::Bye);
        assert_eq!(server.tracker().active_count(), 0);
    }

    #[tokio::test]
    async fn accept_path_does_not_sample() {
        let monitor = Arc::new(IdleMonitor::default());
        let server = MonitorServer::new(
            &ProtocolConfig::default(),
            Arc::clone(&monitor) as Arc<dyn SystemMonitor>,
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut client = TcpStream::connect(addr).await.unwrap();
        let (stream, peer) = listener.accept().await.unwrap();

        // single-threaded runtime: the worker cannot start before we yield
        let handle = server.spawn_worker(stream, peer);
        assert_eq!(monitor.samples.load(Ordering::SeqCst), 0);

        client.write_all(b"BYE\n").await.unwrap();
        let mut reply = String::new();
        client.read_to_string(&mut reply).await.unwrap();
        assert_eq!(reply, "BYE\n");

        assert_eq!(handle.await.unwrap(), WorkerExit::Bye);
        assert_eq!(monitor.samples.load(Ordering::SeqCst), 1);
    }
}
