//! Capacity growth policy.

use super::PoolError;
use crate::digest::DIGEST_LEN;

/// Base increment once the pool holds at least one digest.
const BASE_INCREMENT: usize = DIGEST_LEN * DIGEST_LEN;

/// Computes the capacity to grow to from `capacity`.
///
/// The first growth from an empty pool adds a single digest. After that
/// the increment starts at `DIGEST_LEN²` and doubles until it is at least
/// the current capacity, so growth is geometric. The increment is clamped
/// to whatever headroom remains below `max_capacity`; if that headroom
/// cannot fit one more digest the pool cannot grow at all.
///
/// A successful result is always strictly greater than `capacity` by at
/// least `DIGEST_LEN`.
pub(crate) fn next_capacity(capacity: usize, max_capacity: usize) -> Result<usize, PoolError> {
    let headroom = max_capacity
        .checked_sub(capacity)
        .filter(|&room| room >= DIGEST_LEN)
        .ok_or(PoolError::CapacityOverflow {
            capacity,
            max_capacity,
        })?;

    let mut increment = if capacity == 0 {
        DIGEST_LEN
    } else {
        BASE_INCREMENT
    };
    while increment < capacity {
        match increment.checked_mul(2) {
            Some(doubled) => increment = doubled,
            None => break,
        }
    }

    Ok(capacity + increment.min(headroom))
}
