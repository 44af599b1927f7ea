//! URL pool construction.
//!
//! # Responsibilities
//! - Load a single target URL or a newline-delimited list of them
//! - Validate and resolve every entry before the pool exists
//! - Fail the whole load on the first bad entry
//!
//! # Design Decisions
//! - `UrlPool` has no mutators; it is built once and shared by reference
//! - List files go through the same `LineBuffer` as the protocol worker

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::Arc;

use crate::config::{AddressFamily, PoolConfig};
use crate::pool::error::PoolError;
use crate::pool::resolver::{AddressResolver, SystemResolver};
use crate::pool::url::{Target, UrlDescriptor};
use crate::protocol::line_buffer::LineBuffer;

/// Starting capacity of a pool read from a list.
const INITIAL_URLS: usize = 16;

/// Immutable, non-empty set of resolved targets.
#[derive(Debug, Clone)]
pub struct UrlPool {
    urls: Vec<UrlDescriptor>,
}

impl UrlPool {
    /// Number of targets; at least 1.
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Always false for a loaded pool.
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&UrlDescriptor> {
        self.urls.get(index)
    }

    pub fn urls(&self) -> &[UrlDescriptor] {
        &self.urls
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UrlDescriptor> {
        self.urls.iter()
    }
}

impl<'a> IntoIterator for &'a UrlPool {
    type Item = &'a UrlDescriptor;
    type IntoIter = std::slice::Iter<'a, UrlDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.urls.iter()
    }
}

/// Builds `UrlPool`s.
#[derive(Clone)]
pub struct PoolLoader {
    resolver: Arc<dyn AddressResolver>,
    family: AddressFamily,
    buffer_capacity: usize,
}

impl PoolLoader {
    /// Loader using the system resolver.
    pub fn new(config: &PoolConfig) -> Self {
        Self {
            resolver: Arc::new(SystemResolver),
            family: config.address_family,
            buffer_capacity: config.file_buffer_capacity,
        }
    }

    /// Replace the resolver.
    pub fn with_resolver(mut self, resolver: Arc<dyn AddressResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Pool holding exactly one target.
    pub fn load_one(&self, url: &str) -> Result<UrlPool, PoolError> {
        let descriptor = self.load_entry(url)?;
        Ok(UrlPool {
            urls: vec![descriptor],
        })
    }

    /// Pool from a file with one URL per line.
    pub fn load_file(&self, path: &Path) -> Result<UrlPool, PoolError> {
        let file = File::open(path).map_err(|source| PoolError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let pool = self.load_reader(file)?;
        tracing::info!(count = pool.len(), path = ?path, "Read URLs");
        Ok(pool)
    }

    /// Pool from any byte source with one URL per line.
    ///
    /// Blank lines are skipped. A final line without a newline counts.
    pub fn load_reader<R: Read>(&self, mut reader: R) -> Result<UrlPool, PoolError> {
        let mut buffer = LineBuffer::with_capacity(self.buffer_capacity);
        let mut urls = Vec::with_capacity(INITIAL_URLS);
        let mut line_number = 0;

        loop {
            let n = match reader.read(buffer.spare_mut()) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(PoolError::Read(e)),
            };
            buffer.advance(n);

            while let Some(line) = buffer.next_line() {
                line_number += 1;
                self.push_line(&mut urls, line, line_number)?;
            }

            buffer.compact().map_err(|e| PoolError::LineTooLong {
                line: line_number + 1,
                capacity: e.capacity,
            })?;
        }

        if let Some(line) = buffer.take_remainder() {
            line_number += 1;
            self.push_line(&mut urls, line, line_number)?;
        }

        if urls.is_empty() {
            return Err(PoolError::Empty);
        }
        Ok(UrlPool { urls })
    }

    fn push_line(
        &self,
        urls: &mut Vec<UrlDescriptor>,
        line: &[u8],
        line_number: usize,
    ) -> Result<(), PoolError> {
        let text = std::str::from_utf8(line)
            .map_err(|_| PoolError::Encoding { line: line_number })?
            .trim();
        if text.is_empty() {
            return Ok(());
        }

        let descriptor = self.load_entry(text).map_err(|e| {
            tracing::error!(line = line_number, error = %e, "Rejecting URL list");
            PoolError::Entry {
                line: line_number,
                source: Box::new(e),
            }
        })?;
        urls.push(descriptor);
        Ok(())
    }

    fn load_entry(&self, url: &str) -> Result<UrlDescriptor, PoolError> {
        Target::parse(url)?.resolve(self.resolver.as_ref(), self.family)
    }
}

impl std::fmt::Debug for PoolLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolLoader")
            .field("family", &self.family)
            .field("buffer_capacity", &self.buffer_capacity)
            .finish_non_exhaustive()
    }
}
