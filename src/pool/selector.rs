//! Target and address selection.
//!
//! Selection is stateless: randomness comes from a generator the caller owns,
//! and address choice is a pure function of the connection index. Many
//! workers can select from one shared `UrlPool` without coordination.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::net::SocketAddr;

use crate::pool::loader::UrlPool;
use crate::pool::url::UrlDescriptor;

/// Per-worker random generator. Never share one between workers.
#[derive(Debug, Clone)]
pub struct RandomState(StdRng);

impl RandomState {
    /// Seed from OS entropy.
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    /// Deterministic generator, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RngCore for RandomState {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}

/// Pick a target uniformly at random.
///
/// A single-target pool returns its target without touching `rng`.
pub fn next_url<'a, R: Rng + ?Sized>(pool: &'a UrlPool, rng: &mut R) -> &'a UrlDescriptor {
    let urls = pool.urls();
    if urls.len() == 1 {
        return &urls[0];
    }
    &urls[rng.gen_range(0..urls.len())]
}

/// Sticky round-robin: the address for a given connection index.
pub fn next_address(url: &UrlDescriptor, connection_index: usize) -> SocketAddr {
    let addresses = url.addresses();
    let addr = addresses[connection_index % addresses.len()];
    tracing::trace!(host = url.host(), address = %addr, connection_index, "Connecting");
    addr
}

/// Whether two targets reach the same backend on this connection index.
pub fn same_server(u1: &UrlDescriptor, u2: &UrlDescriptor, connection_index: usize) -> bool {
    if u1.port() != u2.port() {
        return false;
    }
    next_address(u1, connection_index).ip() == next_address(u2, connection_index).ip()
}
