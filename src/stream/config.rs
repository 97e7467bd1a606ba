//! Stream configuration.
//!
//! Settings come from, in increasing priority: built-in defaults, an
//! optional TOML file, the `SHA256RNG_LIMIT` environment variable and
//! command-line flags.

use std::env::{self, VarError};
use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::digest::{HashAlgorithm, DIGEST_LEN};
use crate::pool::{Compaction, PoolConfig};

/// Environment variable holding the byte limit.
pub const LIMIT_ENV: &str = "SHA256RNG_LIMIT";

/// How many bytes to emit before stopping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ByteLimit {
    /// Emit until the process is stopped.
    #[default]
    Unbounded,
    /// Emit exactly this many bytes.
    Bytes(u64),
}

impl ByteLimit {
    /// Reads the limit from [`LIMIT_ENV`].
    ///
    /// Returns `None` if the variable is unset or empty. A set but
    /// malformed value yields `Some(Unbounded)`, which still takes
    /// precedence over a limit from the config file: garbage in the
    /// environment lifts the limit rather than falling back to it.
    pub fn from_env() -> Option<Self> {
        match env::var(LIMIT_ENV) {
            Ok(value) => Self::parse_permissive(&value),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(_)) => {
                tracing::warn!(var = LIMIT_ENV, "Limit is not valid unicode, ignoring");
                Some(ByteLimit::Unbounded)
            }
        }
    }

    /// Parses a limit value without rejecting anything.
    ///
    /// Empty input means "not set". A decimal count becomes a limit;
    /// anything else is logged and treated as unbounded.
    pub fn parse_permissive(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<u64>() {
            Ok(n) => Some(ByteLimit::Bytes(n)),
            Err(e) => {
                tracing::warn!(value = trimmed, error = %e, "Unparsable byte limit, output is unbounded");
                Some(ByteLimit::Unbounded)
            }
        }
    }

    /// Returns true if another byte may be emitted after `emitted` bytes.
    #[inline]
    pub fn allows(&self, emitted: u64) -> bool {
        match *self {
            ByteLimit::Unbounded => true,
            ByteLimit::Bytes(n) => emitted < n,
        }
    }

    /// Diagnostic line announced on stderr when a finite limit is active.
    pub fn diagnostic(&self) -> Option<String> {
        match *self {
            ByteLimit::Unbounded => None,
            ByteLimit::Bytes(n) => Some(format!("SHA256 RNG limited to {} bytes", n)),
        }
    }
}

impl fmt::Display for ByteLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteLimit::Unbounded => f.write_str("unbounded"),
            ByteLimit::Bytes(n) => write!(f, "{} bytes", n),
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// `compaction_divisor` was zero.
    #[error("compaction divisor must be non-zero")]
    ZeroCompactionDivisor,
    /// `max_capacity` cannot hold a single digest.
    #[error("max capacity {0} is smaller than one 32-byte digest")]
    CapacityTooSmall(usize),
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The config file is not valid TOML for this format.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Pool settings.
    #[serde(default)]
    pub pool: PoolSection,
    /// Output settings.
    #[serde(default)]
    pub output: OutputSection,
}

/// `[pool]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSection {
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Compact once the cursor passes `capacity / compaction_divisor`.
    pub compaction_divisor: usize,
    /// Ceiling on buffer capacity in bytes.
    pub max_capacity: usize,
}

impl Default for PoolSection {
    fn default() -> Self {
        let pool = PoolConfig::default();
        Self {
            algorithm: pool.algorithm,
            compaction_divisor: 2,
            max_capacity: pool.max_capacity,
        }
    }
}

/// `[output]` table.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputSection {
    /// Bytes to emit; absent means unbounded.
    pub limit: Option<u64>,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool.compaction_divisor == 0 {
            return Err(ConfigError::ZeroCompactionDivisor);
        }
        if self.pool.max_capacity < DIGEST_LEN {
            return Err(ConfigError::CapacityTooSmall(self.pool.max_capacity));
        }
        Ok(())
    }
}

/// Resolved settings for one run.
#[derive(Debug, Clone, Default)]
pub struct StreamConfig {
    /// Pool settings.
    pub pool: PoolConfig,
    /// Output byte limit.
    pub limit: ByteLimit,
}

impl StreamConfig {
    /// Builds run settings from a configuration file.
    pub fn from_file_config(file: &FileConfig) -> Result<Self, ConfigError> {
        file.validate()?;
        let divisor = NonZeroUsize::new(file.pool.compaction_divisor)
            .ok_or(ConfigError::ZeroCompactionDivisor)?;

        Ok(Self {
            pool: PoolConfig {
                algorithm: file.pool.algorithm,
                compaction: Compaction::Fraction(divisor),
                max_capacity: file.pool.max_capacity,
            },
            limit: file.output.limit.map_or(ByteLimit::Unbounded, ByteLimit::Bytes),
        })
    }

    /// Replaces the limit if an override is given.
    pub fn override_limit(mut self, limit: Option<ByteLimit>) -> Self {
        if let Some(limit) = limit {
            self.limit = limit;
        }
        self
    }
}
