//! Target URL pool for load generation.
//!
//! # Data Flow
//! ```text
//! URL string or URL list file
//!     → loader.rs (line splitting, all-or-nothing load)
//!     → url.rs (scheme/port validation)
//!     → resolver.rs (host → addresses, once)
//!     → UrlPool (immutable, shared by reference)
//!
//! Per outgoing request, from any worker:
//!     → selector.rs next_url (caller-owned RandomState)
//!     → selector.rs next_address (sticky per connection index)
//! ```
//!
//! # Design Decisions
//! - No global pool; callers hold an explicit `UrlPool`
//! - Selection is stateless; each worker owns its random generator
//! - A failed load yields an error and no pool

pub mod error;
pub mod loader;
pub mod resolver;
pub mod selector;
pub mod url;

pub use error::PoolError;
pub use loader::{PoolLoader, UrlPool};
pub use resolver::{AddressResolver, StaticResolver, SystemResolver};
pub use selector::{next_address, next_url, same_server, RandomState};
pub use url::{Scheme, Target, UrlDescriptor};
