//! URL pool error definitions.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::AddressFamily;

/// Errors that abort a pool load. No partial pool survives any of them.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The URL could not be parsed at all.
    #[error("Invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    /// Only http and https targets are supported.
    #[error("Invalid URL scheme {scheme:?} in {url:?}")]
    InvalidScheme { url: String, scheme: String },

    /// The URL names no host to connect to.
    #[error("URL {url:?} has no host")]
    MissingHost { url: String },

    /// DNS lookup failed.
    #[error("Error looking up host {host:?}: {source}")]
    Resolution {
        host: String,
        source: std::io::Error,
    },

    /// DNS answered, but not with an address of the wanted family.
    #[error("Host {host:?} has no {family:?} address")]
    NoAddresses { host: String, family: AddressFamily },

    /// The URL list file could not be opened.
    #[error("Can't open {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Reading the URL list failed part way.
    #[error("Error reading URL list: {0}")]
    Read(#[source] std::io::Error),

    /// A URL list line is longer than the read buffer.
    #[error("Line {line} is longer than {capacity} bytes")]
    LineTooLong { line: usize, capacity: usize },

    /// A URL list line is not valid UTF-8.
    #[error("Line {line} is not valid UTF-8")]
    Encoding { line: usize },

    /// The URL list holds no entries.
    #[error("URL list is empty")]
    Empty,

    /// An entry of a URL list failed.
    #[error("Line {line}: {source}")]
    Entry {
        line: usize,
        source: Box<PoolError>,
    },
}

impl PoolError {
    /// The underlying failure, without list position wrappers.
    pub fn root(&self) -> &PoolError {
        match self {
            PoolError::Entry { source, .. } => source.root(),
            other => other,
        }
    }
}
