//! Host name resolution.
//!
//! The pool loader only needs `(host, port) -> addresses`; keeping that behind
//! a trait lets tests and tooling pin hosts to fixed addresses.

use std::collections::HashMap;
use std::io;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::sync::Arc;

/// DNS capability consumed by the pool loader.
pub trait AddressResolver: Send + Sync {
    /// All addresses for `host`, carrying `port`.
    fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<SocketAddr>>;
}

/// The operating system resolver (getaddrinfo). Blocking.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl AddressResolver for SystemResolver {
    fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
        Ok((host, port).to_socket_addrs()?.collect())
    }
}

/// Fixed host → address table, optionally backed by another resolver.
#[derive(Clone, Default)]
pub struct StaticResolver {
    hosts: HashMap<String, Vec<IpAddr>>,
    fallback: Option<Arc<dyn AddressResolver>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `host` (case-insensitive) to `addrs`, in order.
    pub fn with_host(mut self, host: &str, addrs: impl IntoIterator<Item = IpAddr>) -> Self {
        self.hosts
            .entry(host.to_ascii_lowercase())
            .or_default()
            .extend(addrs);
        self
    }

    /// Resolve hosts missing from the table through `resolver`.
    pub fn with_fallback(mut self, resolver: Arc<dyn AddressResolver>) -> Self {
        self.fallback = Some(resolver);
        self
    }
}

impl std::fmt::Debug for StaticResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticResolver")
            .field("hosts", &self.hosts)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl AddressResolver for StaticResolver {
    fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
        if let Some(addrs) = self.hosts.get(&host.to_ascii_lowercase()) {
            return Ok(addrs.iter().map(|ip| SocketAddr::new(*ip, port)).collect());
        }
        match &self.fallback {
            Some(resolver) => resolver.resolve(host, port),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no static entry for {}", host),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_entries_keep_order_and_port() {
        let resolver = StaticResolver::new()
            .with_host("Backend.Test", ["10.0.0.2".parse::<IpAddr>().unwrap()])
            .with_host("backend.test", ["10.0.0.1".parse::<IpAddr>().unwrap()]);

        let addrs = resolver.resolve("BACKEND.test", 8080).unwrap();
        assert_eq!(
            addrs,
            vec![
                "10.0.0.2:8080".parse::<SocketAddr>().unwrap(),
                "10.0.0.1:8080".parse::<SocketAddr>().unwrap(),
            ]
        );
    }

    #[test]
    fn miss_without_fallback_is_not_found() {
        let err = StaticResolver::new().resolve("nowhere.test", 80).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn miss_uses_fallback() {
        let inner = StaticResolver::new().with_host("inner.test", ["10.1.1.1".parse::<IpAddr>().unwrap()]);
        let outer = StaticResolver::new().with_fallback(Arc::new(inner));
        assert_eq!(outer.resolve("inner.test", 443).unwrap().len(), 1);
    }

    #[test]
    fn system_resolver_handles_ip_literals() {
        let addrs = SystemResolver.resolve("127.0.0.1", 9000).unwrap();
        assert_eq!(addrs, vec!["127.0.0.1:9000".parse::<SocketAddr>().unwrap()]);
    }
}
