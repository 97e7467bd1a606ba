//! Digest primitive.
//!
//! Fixed-size (32 byte) cryptographic digests used both to ingest seed
//! text and to extend the pool. Consumers that only need one digest of a
//! message (sparkline or SVG renderers) can call
//! [`HashAlgorithm::digest`] directly.

mod algorithm;

pub use algorithm::{Digest, HashAlgorithm, HistoryHasher, DIGEST_LEN};
