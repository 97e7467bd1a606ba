//! Deterministic Digest-Pool Byte Stream
//!
//! Turns zero or more seed strings into an unbounded, reproducible stream
//! of bytes by hashing an ever-growing pool of digests. Intended to drive
//! procedural generators and visualizations that need "randomness" tied
//! to a textual seed.
//!
//! # Architecture
//!
//! ```text
//! seeds → digest → pool ⟲ (repool) → stream → stdout
//!                    ↓
//!                 metrics
//! ```
//!
//! # Design Principles
//!
//! - **Deterministic**: identical seeds give byte-identical streams
//! - **Hash chain**: every extension digest covers the pool's full history
//! - **Bounded memory**: consumed bytes are compacted away
//! - **Not a CSPRNG**: the stream is reproducible by construction and must
//!   not be used for keys or nonces
//!
//! # Example
//!
//! ```
//! use sha256rng::{seed_pool, ByteLimit, Emitter, Pool};
//!
//! let mut pool = Pool::default();
//! seed_pool(&mut pool, ["a", "b"]).unwrap();
//!
//! let mut out = Vec::new();
//! Emitter::new()
//!     .run(&mut pool, ByteLimit::Bytes(64), &mut out)
//!     .unwrap();
//! assert_eq!(out.len(), 64);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod digest;
pub mod metrics;
pub mod pool;
pub mod stream;

// Re-export commonly used types at crate root
pub use digest::{Digest, HashAlgorithm, HistoryHasher, DIGEST_LEN};
pub use pool::{Compaction, Pool, PoolConfig, PoolError, PoolStats};
pub use stream::{seed_pool, ByteLimit, Emitter, FileConfig, StreamConfig, StreamError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
