//! Byte stream driver.
//!
//! Glue between a [`Pool`](crate::pool::Pool) and the outside world:
//! start-up seeding, the output limit and writing bytes to a sink.

mod config;
mod emitter;

pub use config::{ByteLimit, ConfigError, FileConfig, OutputSection, PoolSection, StreamConfig, LIMIT_ENV};
pub use emitter::{seed_pool, Emitter, StreamError};
