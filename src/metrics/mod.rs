//! Prometheus metrics for pool activity.
//!
//! # Metrics Exposed
//!
//! ## Counters
//! - `sha256rng_pool_bytes_consumed_total` - Bytes handed out
//! - `sha256rng_pool_seeds_total` - Seed digests appended
//! - `sha256rng_pool_repools_total` - Extension digests appended
//! - `sha256rng_pool_growths_total` - Buffer growths
//! - `sha256rng_pool_compactions_total` - Compactions
//!
//! ## Gauges
//! - `sha256rng_pool_capacity_bytes` - Buffer capacity
//! - `sha256rng_pool_used_bytes` - Written length
//! - `sha256rng_pool_cursor` - Next unread offset
//!
//! # Example
//!
//! ```
//! use sha256rng::{metrics::MetricsRegistry, Pool};
//!
//! let mut pool = Pool::default();
//! pool.repool().unwrap();
//! pool.consume().unwrap();
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//! registry.update(&pool.stats());
//! assert!(registry.encode().unwrap().contains("sha256rng_pool_bytes_consumed_total 1"));
//! ```

mod collector;

pub use collector::{MetricsError, MetricsRegistry};
