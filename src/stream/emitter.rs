//! Writes pool bytes to an output sink.

use std::io::{self, BufWriter, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use super::config::ByteLimit;
use crate::pool::{Pool, PoolError};

/// Errors that end a stream early.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The pool hit a fatal condition.
    #[error(transparent)]
    Pool(#[from] PoolError),
    /// Writing to the sink failed for a reason other than a closed pipe.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Seeds a pool from positional seeds.
///
/// Each seed is pooled in order. With no seeds at all the pool is
/// extended once from empty input, so an unseeded run still has a
/// well-defined stream. Returns the number of seeds pooled.
pub fn seed_pool<I, S>(pool: &mut Pool, seeds: I) -> Result<usize, PoolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut count = 0;
    for seed in seeds {
        pool.pool_bytes(seed.as_ref())?;
        count += 1;
    }
    if count == 0 {
        pool.repool()?;
    }

    tracing::debug!(seeds = count, used = pool.used(), "Pool seeded");
    Ok(count)
}

/// Drives a pool into a writer one byte at a time.
#[derive(Debug, Default)]
pub struct Emitter {
    stop: Option<Arc<AtomicBool>>,
}

impl Emitter {
    /// Creates an emitter that runs until its limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an emitter that also stops once `stop` is set.
    pub fn with_stop_flag(stop: Arc<AtomicBool>) -> Self {
        Self { stop: Some(stop) }
    }

    fn stopped(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Emits bytes until `limit` is reached, the stop flag is raised or the
    /// reader goes away.
    ///
    /// A closed pipe is a normal end of stream, not an error. Returns the
    /// number of bytes handed to the writer.
    pub fn run<W: Write>(
        &self,
        pool: &mut Pool,
        limit: ByteLimit,
        writer: W,
    ) -> Result<u64, StreamError> {
        let mut out = BufWriter::new(writer);
        let mut emitted: u64 = 0;

        while limit.allows(emitted) && !self.stopped() {
            let byte = pool.consume()?;
            if let Err(e) = out.write_all(&[byte]) {
                return finish_on_broken_pipe(e, emitted);
            }
            emitted += 1;
        }

        if let Err(e) = out.flush() {
            return finish_on_broken_pipe(e, emitted);
        }

        tracing::info!(
            emitted,
            limit = %limit,
            stopped = self.stopped(),
            "Stream finished"
        );
        Ok(emitted)
    }
}

fn finish_on_broken_pipe(e: io::Error, emitted: u64) -> Result<u64, StreamError> {
    if e.kind() == io::ErrorKind::BrokenPipe {
        tracing::info!(emitted, "Reader closed the stream");
        Ok(emitted)
    } else {
        Err(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::HashAlgorithm;

    /// Accepts `capacity` bytes, then reports a broken pipe.
    struct ClosingPipe {
        written: Vec<u8>,
        capacity: usize,
    }

    impl Write for ClosingPipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written.len() >= self.capacity {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            let n = buf.len().min(self.capacity - self.written.len());
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn test_seed_pool_without_seeds_repools() {
        let mut pool = Pool::default();
        let count = seed_pool(&mut pool, Vec::<String>::new()).unwrap();

        assert_eq!(count, 0);
        assert_eq!(pool.stats().repools, 1);
        assert_eq!(pool.used(), 32);
    }

    #[test]
    fn test_seed_pool_with_seeds() {
        let mut pool = Pool::default();
        let count = seed_pool(&mut pool, ["a", "b", "c"]).unwrap();

        assert_eq!(count, 3);
        assert_eq!(pool.stats().seeds, 3);
        assert_eq!(pool.stats().repools, 0);
    }

    #[test]
    fn test_run_respects_limit() {
        let mut pool = Pool::default();
        seed_pool(&mut pool, ["abc"]).unwrap();

        let mut out = Vec::new();
        let emitted = Emitter::new()
            .run(&mut pool, ByteLimit::Bytes(32), &mut out)
            .unwrap();

        assert_eq!(emitted, 32);
        assert_eq!(out, HashAlgorithm::Sha256.digest(b"abc"));
    }

    #[test]
    fn test_zero_limit_emits_nothing() {
        let mut pool = Pool::default();
        seed_pool(&mut pool, ["abc"]).unwrap();

        let mut out = Vec::new();
        let emitted = Emitter::new()
            .run(&mut pool, ByteLimit::Bytes(0), &mut out)
            .unwrap();
        assert_eq!(emitted, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_stop_flag_ends_unbounded_stream() {
        let mut pool = Pool::default();
        seed_pool(&mut pool, ["abc"]).unwrap();

        let flag = Arc::new(AtomicBool::new(true));
        let mut out = Vec::new();
        let emitted = Emitter::with_stop_flag(flag)
            .run(&mut pool, ByteLimit::Unbounded, &mut out)
            .unwrap();
        assert_eq!(emitted, 0);
    }

    #[test]
    fn test_broken_pipe_is_clean_exit() {
        let mut pool = Pool::default();
        seed_pool(&mut pool, ["abc"]).unwrap();

        let pipe = ClosingPipe {
            written: Vec::new(),
            capacity: 100,
        };
        let result = Emitter::new().run(&mut pool, ByteLimit::Unbounded, pipe);
        assert!(result.is_ok());
    }

    #[test]
    fn test_other_io_errors_propagate() {
        let mut pool = Pool::default();
        seed_pool(&mut pool, ["abc"]).unwrap();

        let result = Emitter::new().run(&mut pool, ByteLimit::Bytes(10), FailingWriter);
        assert!(matches!(result, Err(StreamError::Io(_))));
    }
}
