//! Metrics collection and registry.

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

use crate::pool::PoolStats;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Metric creation, registration or encoding failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Prometheus metrics registry for a pool.
pub struct MetricsRegistry {
    registry: Registry,

    // Activity counters
    bytes_consumed: IntCounter,
    seeds: IntCounter,
    repools: IntCounter,
    growths: IntCounter,
    compactions: IntCounter,

    // Buffer layout
    capacity: IntGauge,
    used: IntGauge,
    cursor: IntGauge,
}

impl MetricsRegistry {
    /// Creates a new registry with all pool metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let bytes_consumed = IntCounter::new(
            "sha256rng_pool_bytes_consumed_total",
            "Total bytes handed out by the pool",
        )?;
        let seeds = IntCounter::new(
            "sha256rng_pool_seeds_total",
            "Seed digests appended to the pool",
        )?;
        let repools = IntCounter::new(
            "sha256rng_pool_repools_total",
            "Extension digests appended to the pool",
        )?;
        let growths = IntCounter::new(
            "sha256rng_pool_growths_total",
            "Times the pool buffer was enlarged",
        )?;
        let compactions = IntCounter::new(
            "sha256rng_pool_compactions_total",
            "Times consumed bytes were compacted away",
        )?;

        let capacity = IntGauge::new(
            "sha256rng_pool_capacity_bytes",
            "Current pool buffer capacity in bytes",
        )?;
        let used = IntGauge::new(
            "sha256rng_pool_used_bytes",
            "Written length of the pool buffer",
        )?;
        let cursor = IntGauge::new(
            "sha256rng_pool_cursor",
            "Offset of the next unread pool byte",
        )?;

        registry.register(Box::new(bytes_consumed.clone()))?;
        registry.register(Box::new(seeds.clone()))?;
        registry.register(Box::new(repools.clone()))?;
        registry.register(Box::new(growths.clone()))?;
        registry.register(Box::new(compactions.clone()))?;
        registry.register(Box::new(capacity.clone()))?;
        registry.register(Box::new(used.clone()))?;
        registry.register(Box::new(cursor.clone()))?;

        Ok(Self {
            registry,
            bytes_consumed,
            seeds,
            repools,
            growths,
            compactions,
            capacity,
            used,
            cursor,
        })
    }

    /// Updates all metrics from pool stats.
    ///
    /// Counters only move forward, so feeding an older snapshot is a no-op
    /// for them.
    pub fn update(&self, stats: &PoolStats) {
        advance(&self.bytes_consumed, stats.bytes_consumed);
        advance(&self.seeds, stats.seeds);
        advance(&self.repools, stats.repools);
        advance(&self.growths, stats.growths);
        advance(&self.compactions, stats.compactions);

        self.capacity.set(stats.capacity as i64);
        self.used.set(stats.used as i64);
        self.cursor.set(stats.cursor as i64);
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn advance(counter: &IntCounter, target: u64) {
    let current = counter.get();
    if target > current {
        counter.inc_by(target - current);
    }
}
