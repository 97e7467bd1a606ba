//! sha256rng CLI
//!
//! Writes a deterministic byte stream derived from the seed arguments to
//! stdout. Set `SHA256RNG_LIMIT` (or pass `--limit`) to stop after a fixed
//! number of bytes.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use sha256rng::{
    metrics::MetricsRegistry,
    pool::{Compaction, Pool, PoolError},
    stream::{seed_pool, ByteLimit, ConfigError, Emitter, FileConfig, StreamConfig, StreamError},
    HashAlgorithm,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Deterministic pseudo-random bytes from seed text.
#[derive(Debug, Parser)]
#[command(name = "sha256rng", version, about, long_about = None)]
struct Cli {
    /// Seed strings, pooled in order. Seeds may start with '-'; everything
    /// after the first seed is taken as a seed. Use `--` for a seed that
    /// collides with a flag name.
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    seeds: Vec<OsString>,

    /// Digest algorithm (sha256 or blake3).
    #[arg(short, long)]
    algorithm: Option<HashAlgorithm>,

    /// Stop after this many bytes. Overrides SHA256RNG_LIMIT.
    #[arg(short, long, value_name = "BYTES")]
    limit: Option<u64>,

    /// TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Compact the pool whenever the cursor passes this offset.
    #[arg(long, value_name = "OFFSET")]
    compact_every: Option<usize>,

    /// Print pool metrics in Prometheus text format to stderr on exit.
    #[arg(long)]
    metrics: bool,
}

fn main() {
    // stdout carries the stream, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("sha256rng: {}", e);
            process::exit(1);
        }
    };
    info!(
        version = sha256rng::VERSION,
        algorithm = %config.pool.algorithm,
        limit = %config.limit,
        "Starting stream"
    );

    if let Some(line) = config.limit.diagnostic() {
        eprintln!("{}", line);
    }

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        if let Err(e) = ctrlc::set_handler(move || stop.store(true, Ordering::Relaxed)) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut pool = Pool::new(config.pool.clone());
    if let Err(e) = seed_pool(&mut pool, cli.seeds.iter().map(|s| s.as_encoded_bytes())) {
        fatal(&e);
    }

    let stdout = io::stdout();
    let result = Emitter::with_stop_flag(stop).run(&mut pool, config.limit, stdout.lock());

    if cli.metrics {
        report_metrics(&pool);
    }

    match result {
        Ok(_) => {}
        Err(StreamError::Pool(e)) => fatal(&e),
        Err(e) => {
            eprintln!("sha256rng: {}", e);
            process::exit(1);
        }
    }
}

/// Layers file, environment and flag settings.
fn resolve_config(cli: &Cli) -> Result<StreamConfig, ConfigError> {
    let file = match &cli.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };

    let mut config = StreamConfig::from_file_config(&file)?
        .override_limit(ByteLimit::from_env())
        .override_limit(cli.limit.map(ByteLimit::Bytes));

    if let Some(algorithm) = cli.algorithm {
        config.pool.algorithm = algorithm;
    }
    if let Some(offset) = cli.compact_every {
        config.pool.compaction = Compaction::Offset(offset);
    }
    Ok(config)
}

fn report_metrics(pool: &Pool) {
    let encoded = MetricsRegistry::new().and_then(|registry| {
        registry.update(&pool.stats());
        registry.encode()
    });
    match encoded {
        Ok(text) => eprint!("{}", text),
        Err(e) => warn!("Failed to encode metrics: {}", e),
    }
}

/// Pool exhaustion cannot be recovered from.
fn fatal(e: &PoolError) -> ! {
    eprintln!("sha256rng: {}", e);
    process::abort();
}
