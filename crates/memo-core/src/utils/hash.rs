//! Streaming content hashing for cache files.
//!
//! Files are read in fixed-size blocks and fed to an incremental digest, so
//! the resulting hash never depends on the block size. A file that cannot be
//! opened or read hashes to [`SENTINEL_HASH`], which no real digest equals.

use crate::error::{MemoError, MemoResult};
use crate::report::{CacheEvent, Reporter, TracingReporter};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::str::FromStr;

/// Default read block size (1 MiB)
pub const DEFAULT_CHUNK_SIZE: usize = 1 << 20;

/// Hash reported for files that cannot be read
pub const SENTINEL_HASH: &str = "";

/// Digest algorithm used for content hashes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// MD5, matching the output of `md5sum`
    #[default]
    Md5,
    Blake3,
    Sha256,
}

impl HashAlgorithm {
    /// Canonical lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Blake3 => "blake3",
            HashAlgorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = MemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "blake3" => Ok(HashAlgorithm::Blake3),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            other => Err(MemoError::UnknownAlgorithm {
                name: other.to_string(),
            }),
        }
    }
}

/// Incremental digest state for one of the supported algorithms
enum Digester {
    Md5(md5::Context),
    Blake3(Box<blake3::Hasher>),
    Sha256(Sha256),
}

impl Digester {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => Digester::Md5(md5::Context::new()),
            HashAlgorithm::Blake3 => Digester::Blake3(Box::new(blake3::Hasher::new())),
            HashAlgorithm::Sha256 => Digester::Sha256(Sha256::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Digester::Md5(ctx) => ctx.consume(data),
            Digester::Blake3(hasher) => {
                hasher.update(data);
            },
            Digester::Sha256(hasher) => hasher.update(data),
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            Digester::Md5(ctx) => format!("{:x}", ctx.compute()),
            Digester::Blake3(hasher) => hasher.finalize().to_hex().to_string(),
            Digester::Sha256(hasher) => hex::encode(hasher.finalize()),
        }
    }
}

/// Compute the hex digest of in-memory data
pub fn hash_bytes(data: &[u8], algorithm: HashAlgorithm) -> String {
    let mut digester = Digester::new(algorithm);
    digester.update(data);
    digester.finalize_hex()
}

/// Hashes files by streaming them in fixed-size blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHasher {
    algorithm: HashAlgorithm,
    chunk_size: usize,
}

impl FileHasher {
    /// Create a hasher with the default chunk size
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Use a different read block size
    pub fn with_chunk_size(self, chunk_size: usize) -> MemoResult<Self> {
        if chunk_size == 0 {
            return Err(MemoError::ConfigValidation {
                field: "chunk_size".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(Self { chunk_size, ..self })
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Hash a file, returning the underlying error on failure
    pub fn try_hash_file(&self, path: &Path) -> MemoResult<String> {
        let mut file = File::open(path)
            .map_err(|e| MemoError::io(format!("Failed to open {}", path.display()), e))?;

        let mut buffer = vec![0u8; self.chunk_size];
        let mut digester = Digester::new(self.algorithm);
        loop {
            match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => digester.update(&buffer[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(MemoError::io(format!("Failed to read {}", path.display()), e));
                },
            }
        }
        Ok(digester.finalize_hex())
    }

    /// Hash a file, reporting failures and returning [`SENTINEL_HASH`] instead of an error
    pub fn compute_hash(&self, path: &Path, reporter: &dyn Reporter) -> String {
        match self.try_hash_file(path) {
            Ok(hash) => hash,
            Err(e) => {
                reporter.report(&CacheEvent::OpenFailed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                SENTINEL_HASH.to_string()
            },
        }
    }
}

impl Default for FileHasher {
    fn default() -> Self {
        Self::new(HashAlgorithm::default())
    }
}

/// Hash a file with the default algorithm, reporting failures through `tracing`
pub fn compute_hash(path: impl AsRef<Path>) -> String {
    FileHasher::default().compute_hash(path.as_ref(), &TracingReporter)
}
