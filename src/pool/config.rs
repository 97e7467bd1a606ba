//! Pool tuning knobs.

use std::num::NonZeroUsize;

use crate::digest::HashAlgorithm;

/// When the pool shifts its unread bytes back to offset zero.
///
/// Compaction never changes the produced stream; it only bounds how much
/// already-consumed material the buffer keeps around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compaction {
    /// Never compact. The buffer grows with every digest ever produced.
    Never,
    /// Compact once the cursor passes `capacity / n`.
    Fraction(NonZeroUsize),
    /// Compact once the cursor passes a fixed offset. `Offset(0)`
    /// compacts after every byte.
    Offset(usize),
}

impl Compaction {
    /// Half-capacity trigger.
    pub const HALF: Compaction = Compaction::Fraction(match NonZeroUsize::new(2) {
        Some(n) => n,
        None => unreachable!(),
    });

    /// Returns true if a pool with this cursor and capacity should compact.
    #[inline]
    pub fn should_compact(&self, cursor: usize, capacity: usize) -> bool {
        match *self {
            Compaction::Never => false,
            Compaction::Fraction(n) => cursor > capacity / n.get(),
            Compaction::Offset(offset) => cursor > offset,
        }
    }
}

impl Default for Compaction {
    fn default() -> Self {
        Compaction::HALF
    }
}

/// Configuration for a [`Pool`](super::Pool).
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Digest algorithm for seeding and extension.
    pub algorithm: HashAlgorithm,
    /// Compaction trigger.
    pub compaction: Compaction,
    /// Hard ceiling on buffer capacity in bytes.
    pub max_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Sha256,
            compaction: Compaction::HALF,
            // Largest allocation a Vec can make.
            max_capacity: isize::MAX as usize,
        }
    }
}

impl PoolConfig {
    /// Creates a default configuration using the given algorithm.
    pub fn with_algorithm(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            ..Default::default()
        }
    }
}
