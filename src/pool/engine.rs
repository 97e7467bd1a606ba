//! The pool engine.
//!
//! Layout of the buffer at any point:
//!
//! ```text
//! 0          cursor            used               capacity
//! |-- spent --|--- unread -------|----- free --------|
//! ```
//!
//! Bytes only ever enter the buffer as whole digests appended at `used`,
//! and only ever leave it through compaction, which drops the spent prefix.

use std::collections::TryReserveError;
use std::fmt;

use rand_core::RngCore;
use thiserror::Error;

use super::config::PoolConfig;
use super::growth::next_capacity;
use crate::digest::{HistoryHasher, DIGEST_LEN};

/// Fatal pool conditions. Neither can be retried meaningfully.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Another digest would push the buffer past its capacity ceiling.
    #[error("pool capacity {capacity} cannot grow by another digest (limit {max_capacity})")]
    CapacityOverflow {
        /// Capacity at the time of the failed growth.
        capacity: usize,
        /// Configured ceiling.
        max_capacity: usize,
    },
    /// The allocator refused to enlarge the buffer.
    #[error("failed to grow pool to {requested} bytes")]
    AllocationFailed {
        /// Capacity that was asked for.
        requested: usize,
        /// Allocator error.
        #[source]
        source: TryReserveError,
    },
}

/// Counters and offsets describing a pool at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Bytes handed out by `consume`.
    pub bytes_consumed: u64,
    /// Seed digests appended.
    pub seeds: u64,
    /// Extension digests appended.
    pub repools: u64,
    /// Buffer growths.
    pub growths: u64,
    /// Compactions performed.
    pub compactions: u64,
    /// Current buffer capacity in bytes.
    pub capacity: usize,
    /// Current written length.
    pub used: usize,
    /// Current read cursor.
    pub cursor: usize,
}

/// Deterministic byte source backed by a growing pool of digests.
///
/// # Example
///
/// ```
/// use sha256rng::{HashAlgorithm, Pool};
///
/// let mut pool = Pool::default();
/// pool.pool_str("abc").unwrap();
///
/// let mut out = [0u8; 32];
/// pool.fill(&mut out).unwrap();
/// assert_eq!(out, HashAlgorithm::Sha256.digest(b"abc"));
/// ```
pub struct Pool {
    /// Backing storage; its length is the pool capacity.
    buffer: Vec<u8>,
    used: usize,
    cursor: usize,
    /// Every digest ever appended, in order. Extension hashes this rather
    /// than `buffer[..used]` so compaction leaves the stream unchanged.
    history: HistoryHasher,
    config: PoolConfig,
    stats: PoolStats,
}

impl Pool {
    /// Creates an empty pool with zero capacity.
    pub fn new(config: PoolConfig) -> Self {
        Self {
            buffer: Vec::new(),
            used: 0,
            cursor: 0,
            history: HistoryHasher::new(config.algorithm),
            config,
            stats: PoolStats::default(),
        }
    }

    /// Guarantees room for at least one more digest, growing the buffer
    /// if necessary.
    pub fn ensure_room(&mut self) -> Result<(), PoolError> {
        let capacity = self.capacity();
        if capacity - self.used >= DIGEST_LEN {
            return Ok(());
        }

        let new_capacity = next_capacity(capacity, self.config.max_capacity)?;
        self.buffer
            .try_reserve_exact(new_capacity - capacity)
            .map_err(|source| PoolError::AllocationFailed {
                requested: new_capacity,
                source,
            })?;
        self.buffer.resize(new_capacity, 0);
        self.stats.growths += 1;

        tracing::trace!(
            old_capacity = capacity,
            new_capacity,
            used = self.used,
            "Grew pool"
        );
        Ok(())
    }

    /// Appends the digest of a textual seed.
    pub fn pool_str(&mut self, text: &str) -> Result<(), PoolError> {
        self.pool_bytes(text.as_bytes())
    }

    /// Appends the digest of a raw byte seed.
    ///
    /// Each seed is hashed on its own; seeds are only chained together
    /// later, through extension.
    pub fn pool_bytes(&mut self, seed: &[u8]) -> Result<(), PoolError> {
        let digest = self.config.algorithm.digest(seed);
        self.append(&digest)?;
        self.stats.seeds += 1;

        tracing::debug!(seed_len = seed.len(), used = self.used, "Pooled seed");
        Ok(())
    }

    /// Appends the digest of the pool's entire history.
    pub fn repool(&mut self) -> Result<(), PoolError> {
        let digest = self.history.snapshot();
        self.append(&digest)?;
        self.stats.repools += 1;

        tracing::trace!(
            history_bytes = self.history.bytes_hashed(),
            used = self.used,
            "Repooled"
        );
        Ok(())
    }

    /// Returns the next byte of the stream.
    ///
    /// Extends the pool first when less than one digest of unread material
    /// remains, so a successful call always yields a byte.
    pub fn consume(&mut self) -> Result<u8, PoolError> {
        if self.available() < DIGEST_LEN {
            self.repool()?;
        }

        let byte = self.buffer[self.cursor];
        self.cursor += 1;
        self.stats.bytes_consumed += 1;

        if self
            .config
            .compaction
            .should_compact(self.cursor, self.capacity())
        {
            self.compact();
        }
        Ok(byte)
    }

    /// Fills `dest` with consecutive stream bytes.
    pub fn fill(&mut self, dest: &mut [u8]) -> Result<(), PoolError> {
        for slot in dest.iter_mut() {
            *slot = self.consume()?;
        }
        Ok(())
    }

    /// Moves the unread region `[cursor, used)` to the start of the buffer.
    fn compact(&mut self) {
        let spent = self.cursor;
        self.buffer.copy_within(spent..self.used, 0);
        self.used -= spent;
        self.cursor = 0;
        self.stats.compactions += 1;

        tracing::trace!(dropped = spent, used = self.used, "Compacted pool");
    }

    fn append(&mut self, digest: &[u8; DIGEST_LEN]) -> Result<(), PoolError> {
        self.ensure_room()?;
        self.buffer[self.used..self.used + DIGEST_LEN].copy_from_slice(digest);
        self.used += DIGEST_LEN;
        self.history.update(digest);
        Ok(())
    }

    /// Length of the written prefix.
    #[inline]
    pub fn used(&self) -> usize {
        self.used
    }

    /// Index of the next unread byte.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current buffer capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Unread bytes remaining before the next extension.
    #[inline]
    pub fn available(&self) -> usize {
        self.used - self.cursor
    }

    /// Snapshot of counters and offsets.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            capacity: self.capacity(),
            used: self.used,
            cursor: self.cursor,
            ..self.stats.clone()
        }
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl fmt::Debug for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("algorithm", &self.config.algorithm)
            .field("capacity", &self.capacity())
            .field("used", &self.used)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

/// Lets the pool drive anything that takes a `rand_core` generator.
///
/// The infallible methods panic if the pool hits a fatal condition; use
/// `try_fill_bytes` to observe it instead.
impl RngCore for Pool {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(e) = self.fill(dest) {
            panic!("pool failed: {e}");
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill(dest).map_err(rand_core::Error::new)
    }
}
