//! Target URL abstraction.
//!
//! # Responsibilities
//! - Parse and validate a target URL (http/https only)
//! - Apply scheme default ports
//! - Resolve the host exactly once into an immutable address list

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use url::{Host, Url};

use crate::config::AddressFamily;
use crate::pool::error::PoolError;
use crate::pool::resolver::AddressResolver;

/// Supported target schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    fn from_url(scheme: &str) -> Option<Self> {
        match scheme {
            "http" => Some(Scheme::Http),
            "https" => Some(Scheme::Https),
            _ => None,
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// A validated URL whose host has not been resolved yet.
#[derive(Debug, Clone)]
pub struct Target {
    url: Url,
    scheme: Scheme,
    port: u16,
}

impl Target {
    /// Parse and validate a URL string.
    pub fn parse(input: &str) -> Result<Self, PoolError> {
        let url = Url::parse(input).map_err(|source| PoolError::InvalidUrl {
            url: input.to_string(),
            source,
        })?;

        let scheme = Scheme::from_url(url.scheme()).ok_or_else(|| PoolError::InvalidScheme {
            url: input.to_string(),
            scheme: url.scheme().to_string(),
        })?;

        if url.host().is_none() {
            return Err(PoolError::MissingHost {
                url: input.to_string(),
            });
        }

        // Url::port() is None for both an absent and an explicit default port
        let port = url.port().unwrap_or_else(|| scheme.default_port());

        Ok(Self { url, scheme, port })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Look up the host, keeping addresses of `family` only.
    ///
    /// IP literal hosts never reach the resolver.
    pub fn resolve(
        self,
        resolver: &dyn AddressResolver,
        family: AddressFamily,
    ) -> Result<UrlDescriptor, PoolError> {
        let host = self.url.host_str().unwrap_or_default().to_string();

        let candidates = match self.url.host() {
            Some(Host::Domain(domain)) => {
                resolver
                    .resolve(domain, self.port)
                    .map_err(|source| PoolError::Resolution {
                        host: host.clone(),
                        source,
                    })?
            }
            Some(Host::Ipv4(ip)) => vec![SocketAddr::new(IpAddr::V4(ip), self.port)],
            Some(Host::Ipv6(ip)) => vec![SocketAddr::new(IpAddr::V6(ip), self.port)],
            None => return Err(PoolError::MissingHost { url: self.url.to_string() }),
        };

        let addresses: Vec<SocketAddr> = candidates
            .into_iter()
            .filter(|a| family.matches(a))
            .map(|a| SocketAddr::new(a.ip(), self.port))
            .collect();
        if addresses.is_empty() {
            return Err(PoolError::NoAddresses { host, family });
        }

        tracing::debug!(
            host = %host,
            port = self.port,
            addresses = addresses.len(),
            "Resolved target"
        );

        Ok(UrlDescriptor {
            url: self.url,
            scheme: self.scheme,
            host,
            port: self.port,
            addresses: Arc::from(addresses),
        })
    }
}

/// A parsed and resolved target.
///
/// The address list is non-empty and fixed for the descriptor's lifetime.
#[derive(Debug, Clone)]
pub struct UrlDescriptor {
    url: Url,
    scheme: Scheme,
    host: String,
    port: u16,
    addresses: Arc<[SocketAddr]>,
}

impl UrlDescriptor {
    /// The full parsed URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_ssl(&self) -> bool {
        self.scheme == Scheme::Https
    }

    /// Resolved addresses, in resolver order.
    pub fn addresses(&self) -> &[SocketAddr] {
        &self.addresses
    }

    /// Request target: path plus query, as sent on the request line.
    pub fn path_and_query(&self) -> String {
        match self.url.query() {
            Some(q) => format!("{}?{}", self.url.path(), q),
            None => self.url.path().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::resolver::StaticResolver;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    fn resolver() -> StaticResolver {
        StaticResolver::new()
            .with_host("api.test", [ip("10.0.0.1"), ip("::1")])
            .with_host("v6.test", [ip("::2")])
    }

    #[test]
    fn default_ports_per_scheme() {
        assert_eq!(Target::parse("http://api.test/").unwrap().port(), 80);
        assert_eq!(Target::parse("https://api.test/").unwrap().port(), 443);
        assert_eq!(Target::parse("https://api.test:443/").unwrap().port(), 443);
        assert_eq!(Target::parse("http://api.test:8080/").unwrap().port(), 8080);
    }

    #[test]
    fn rejects_other_schemes() {
        match Target::parse("ftp://api.test/file") {
            Err(PoolError::InvalidScheme { scheme, .. }) => assert_eq!(scheme, "ftp"),
            other => panic!("expected InvalidScheme, got {:?}", other),
        }
        assert!(matches!(
            Target::parse("api.test/path"),
            Err(PoolError::InvalidUrl { .. })
        ));
        assert!(matches!(
            Target::parse("http://"),
            Err(PoolError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn resolves_and_filters_family() {
        let d = Target::parse("https://api.test:8443/a/b?x=1")
            .unwrap()
            .resolve(&resolver(), AddressFamily::Ipv4)
            .unwrap();

        assert!(d.is_ssl());
        assert_eq!(d.host(), "api.test");
        assert_eq!(d.addresses(), &["10.0.0.1:8443".parse::<SocketAddr>().unwrap()]);
        assert_eq!(d.path_and_query(), "/a/b?x=1");

        let any = Target::parse("http://api.test/")
            .unwrap()
            .resolve(&resolver(), AddressFamily::Any)
            .unwrap();
        assert_eq!(any.addresses().len(), 2);
        assert!(!any.is_ssl());
    }

    #[test]
    fn family_without_match_fails() {
        let err = Target::parse("http://v6.test/")
            .unwrap()
            .resolve(&resolver(), AddressFamily::Ipv4)
            .unwrap_err();
        assert!(matches!(err, PoolError::NoAddresses { .. }));
    }

    #[test]
    fn unknown_host_is_resolution_error() {
        let err = Target::parse("http://missing.test/")
            .unwrap()
            .resolve(&resolver(), AddressFamily::Any)
            .unwrap_err();
        assert!(matches!(err, PoolError::Resolution { .. }));
    }

    #[test]
    fn ip_literals_skip_resolver() {
        let d = Target::parse("http://192.168.1.5:81/")
            .unwrap()
            .resolve(&StaticResolver::new(), AddressFamily::Ipv4)
            .unwrap();
        assert_eq!(d.addresses(), &["192.168.1.5:81".parse::<SocketAddr>().unwrap()]);

        let v6 = Target::parse("http://[::1]/")
            .unwrap()
            .resolve(&StaticResolver::new(), AddressFamily::Ipv6)
            .unwrap();
        assert_eq!(v6.host(), "[::1]");
        assert_eq!(v6.addresses()[0].port(), 80);
    }
}
