//! TCP listener setup.
//!
//! # Responsibilities
//! - Bind to the configured address and port
//! - Enable address reuse and listen with a fixed backlog
//! - Accept incoming TCP connections
//!
//! There is no connection cap: every accepted socket gets a worker, bounded
//! only by process limits.

use std::io;
use std::net::{IpAddr, SocketAddr};
use thiserror::Error;
use tokio::net::{TcpListener, TcpSocket, TcpStream};

use crate::config::ListenerConfig;

/// Error type for listener setup. All variants are fatal at startup.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("Invalid bind address {address:?}: {source}")]
    Address {
        address: String,
        source: std::net::AddrParseError,
    },

    #[error("Failed to create socket: {0}")]
    Socket(#[source] io::Error),

    #[error("Failed to set SO_REUSEADDR: {0}")]
    ReuseAddr(#[source] io::Error),

    #[error("Failed to bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },

    #[error("Failed to listen: {0}")]
    Listen(#[source] io::Error),
}

/// A bound, listening TCP socket.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
}

impl Listener {
    /// Bind to the configured address.
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let ip: IpAddr = config
            .bind_address
            .parse()
            .map_err(|source| ListenerError::Address {
                address: config.bind_address.clone(),
                source,
            })?;
        let addr = SocketAddr::new(ip, config.port);

        let socket = match ip {
            IpAddr::V4(_) => TcpSocket::new_v4(),
            IpAddr::V6(_) => TcpSocket::new_v6(),
        }
        .map_err(ListenerError::Socket)?;

        socket.set_reuseaddr(true).map_err(ListenerError::ReuseAddr)?;
        socket
            .bind(addr)
            .map_err(|source| ListenerError::Bind { addr, source })?;
        let inner = socket.listen(config.backlog).map_err(ListenerError::Listen)?;

        let local_addr = inner.local_addr().map_err(ListenerError::Listen)?;
        tracing::info!(
            address = %local_addr,
            backlog = config.backlog,
            "Listener bound"
        );

        Ok(Self { inner })
    }

    /// Accept the next connection.
    pub async fn accept(&self) -> io::Result<(TcpStream, SocketAddr)> {
        let (stream, addr) = self.inner.accept().await?;
        tracing::debug!(peer_addr = %addr, "Connection accepted");
        Ok((stream, addr))
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }
}
