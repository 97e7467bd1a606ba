//! Hash algorithms backing the pool.
//!
//! Both supported algorithms produce 32-byte digests, so the pool layout
//! does not depend on which one is selected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

/// Size in bytes of every digest appended to the pool.
pub const DIGEST_LEN: usize = 32;

/// A single digest.
pub type Digest = [u8; DIGEST_LEN];

/// Supported hash algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256, the reference algorithm for the stream.
    #[default]
    Sha256,
    /// BLAKE3, faster but yields a different stream for the same seeds.
    Blake3,
}

impl HashAlgorithm {
    /// Computes the digest of `data` in one shot.
    pub fn digest(&self, data: &[u8]) -> Digest {
        match self {
            HashAlgorithm::Sha256 => Sha256::digest(data).into(),
            HashAlgorithm::Blake3 => *blake3::hash(data).as_bytes(),
        }
    }

    /// Returns the lowercase name used in configuration and on the CLI.
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when an algorithm name is not recognised.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown hash algorithm '{0}' (expected sha256 or blake3)")]
pub struct UnknownAlgorithm(String);

impl FromStr for HashAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            "blake3" => Ok(HashAlgorithm::Blake3),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Running hash over every byte ever appended to a pool.
///
/// [`snapshot`](Self::snapshot) finalizes a copy of the state, so the
/// hasher keeps accumulating afterwards. Feeding bytes `B` and taking a
/// snapshot yields the same value as `HashAlgorithm::digest(B)`.
#[derive(Clone)]
pub struct HistoryHasher {
    state: HasherState,
    bytes_hashed: u64,
}

#[derive(Clone)]
enum HasherState {
    Sha256(Sha256),
    Blake3(Box<blake3::Hasher>),
}

impl HistoryHasher {
    /// Creates an empty history for the given algorithm.
    pub fn new(algorithm: HashAlgorithm) -> Self {
        let state = match algorithm {
            HashAlgorithm::Sha256 => HasherState::Sha256(Sha256::new()),
            HashAlgorithm::Blake3 => HasherState::Blake3(Box::new(blake3::Hasher::new())),
        };
        Self {
            state,
            bytes_hashed: 0,
        }
    }

    /// Appends bytes to the history.
    pub fn update(&mut self, data: &[u8]) {
        match &mut self.state {
            HasherState::Sha256(hasher) => hasher.update(data),
            HasherState::Blake3(hasher) => {
                hasher.update(data);
            }
        }
        self.bytes_hashed += data.len() as u64;
    }

    /// Returns the digest of the whole history so far.
    pub fn snapshot(&self) -> Digest {
        match &self.state {
            HasherState::Sha256(hasher) => hasher.clone().finalize().into(),
            HasherState::Blake3(hasher) => *hasher.finalize().as_bytes(),
        }
    }

    /// Total number of bytes fed into the history.
    #[inline]
    pub fn bytes_hashed(&self) -> u64 {
        self.bytes_hashed
    }
}

impl fmt::Debug for HistoryHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let algorithm = match self.state {
            HasherState::Sha256(_) => HashAlgorithm::Sha256,
            HasherState::Blake3(_) => HashAlgorithm::Blake3,
        };
        f.debug_struct("HistoryHasher")
            .field("algorithm", &algorithm)
            .field("bytes_hashed", &self.bytes_hashed)
            .finish()
    }
}
