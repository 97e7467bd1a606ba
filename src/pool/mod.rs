//! Self-extending digest pool.
//!
//! The pool accumulates digests of seed text, hands them out one byte at
//! a time and, once fewer than a digest's worth of unread bytes remain,
//! appends the digest of everything it has ever held. Consumed bytes are
//! periodically compacted away so memory stays bounded.

mod config;
mod engine;
mod growth;

pub use config::{Compaction, PoolConfig};
pub use engine::{Pool, PoolError, PoolStats};
