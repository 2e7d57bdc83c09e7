//! Hash-gated memoization of a computation
//!
//! A [`Memoized`] wraps a computation together with a cache file path and
//! the hash that file is expected to have. Each call hashes the file; when
//! the hash matches and the file decodes, the stored value is returned and
//! the computation is skipped. Otherwise the computation runs, its result is
//! written back (best effort) and returned.
//!
//! Note that the hash gates on the *cache file*, not on the inputs. The
//! expected hash is fixed at construction, so after a miss the next call
//! still misses until a new wrapper is built with the hash of the file that
//! was just written.
//!
//! ## Empty values
//!
//! By default any value that loads successfully counts as a hit. Older
//! callers relied on empty values (empty list, zero, empty string) being
//! treated as a miss and recomputed; [`Memoized::recompute_on_empty`] turns
//! that behavior back on for types implementing [`Truthy`].

use crate::codec::{Codec, JsonCodec};
use crate::store::CacheStore;
use memo_config::{ConfigResult, MemoConfig, PolicySection};
use memo_core::report::{CacheEvent, Reporter};
use memo_core::types::{Truthy, WriteMode};
use memo_core::utils::hash::FileHasher;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Cache file used by [`Memoized::at_default_path`]
pub const DEFAULT_CACHE_FILE: &str = "cache.json";

/// Outcome of checking the cache file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The file matched the expected hash and held an acceptable value
    Hit(T),
    /// The computation has to run
    Miss(MissReason),
}

/// Why a lookup missed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissReason {
    /// The file hash differs from the expected one (or the file is unreadable)
    HashMismatch { actual_hash: String },
    /// The hash matched but the file could not be loaded
    LoadFailed,
    /// The value loaded but the acceptance policy rejected it
    Rejected,
}

impl<T> Lookup<T> {
    /// The cached value, if this was a hit
    pub fn into_hit(self) -> Option<T> {
        match self {
            Lookup::Hit(value) => Some(value),
            Lookup::Miss(_) => None,
        }
    }
}

fn accept_any<T>(_: &T) -> bool {
    true
}

fn accept_truthy<T: Truthy>(value: &T) -> bool {
    value.is_truthy()
}

/// A computation memoized in a single cache file
pub struct Memoized<F, T, C = JsonCodec> {
    compute: F,
    path: PathBuf,
    expected_hash: Option<String>,
    hasher: FileHasher,
    store: CacheStore<C>,
    accept: fn(&T) -> bool,
}

/// Wrap `compute` so its result is cached at `path`
///
/// Same as [`Memoized::new`]; named after the decorator it replaces.
pub fn cached_call<F, T>(
    compute: F,
    path: impl Into<PathBuf>,
    expected_hash: Option<&str>,
) -> Memoized<F, T> {
    Memoized::new(compute, path, expected_hash)
}

impl<F, T> Memoized<F, T, JsonCodec> {
    /// Wrap `compute`, caching its result at `path`
    ///
    /// An absent or empty `expected_hash` never matches, so every call
    /// recomputes.
    pub fn new(compute: F, path: impl Into<PathBuf>, expected_hash: Option<&str>) -> Self {
        Self {
            compute,
            path: path.into(),
            expected_hash: expected_hash
                .filter(|hash| !hash.is_empty())
                .map(str::to_string),
            hasher: FileHasher::default(),
            store: CacheStore::new(),
            accept: accept_any::<T>,
        }
    }

    /// Wrap `compute`, caching its result in `cache.json` in the working directory
    pub fn at_default_path(compute: F, expected_hash: Option<&str>) -> Self {
        Self::new(compute, DEFAULT_CACHE_FILE, expected_hash)
    }

    /// Apply the `[hash]` and `[store]` sections of a configuration
    ///
    /// The `[policy]` section needs `T: Truthy`; see [`Memoized::with_policy`].
    pub fn with_config(self, config: &MemoConfig) -> ConfigResult<Self> {
        let hasher = config.hasher()?;
        let codec = if config.store.pretty {
            JsonCodec::pretty()
        } else {
            JsonCodec::new()
        };
        Ok(self
            .with_hasher(hasher)
            .with_codec(codec)
            .with_write_mode(config.store.write_mode))
    }
}

impl<F, T, C: Codec> Memoized<F, T, C> {
    /// Use a different serialization codec
    pub fn with_codec<C2: Codec>(self, codec: C2) -> Memoized<F, T, C2> {
        let write_mode = self.store.write_mode();
        let reporter = self.store.reporter_handle();
        Memoized {
            compute: self.compute,
            path: self.path,
            expected_hash: self.expected_hash,
            hasher: self.hasher,
            store: CacheStore::with_codec(codec)
                .with_write_mode(write_mode)
                .with_reporter(reporter),
            accept: self.accept,
        }
    }

    /// Send cache events to `reporter` instead of `tracing`
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.store = self.store.with_reporter(reporter);
        self
    }

    pub fn with_hasher(mut self, hasher: FileHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.store = self.store.with_write_mode(write_mode);
        self
    }

    /// Treat a loaded value that is empty or zero as a cache miss
    pub fn recompute_on_empty(mut self) -> Self
    where
        T: Truthy,
    {
        self.accept = accept_truthy::<T>;
        self
    }

    /// Accept every value that loads, including empty ones (the default)
    pub fn accept_empty(mut self) -> Self {
        self.accept = accept_any::<T>;
        self
    }

    /// Apply the `[policy]` section of a configuration
    pub fn with_policy(self, policy: &PolicySection) -> Self
    where
        T: Truthy,
    {
        if policy.recompute_on_empty {
            self.recompute_on_empty()
        } else {
            self.accept_empty()
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn expected_hash(&self) -> Option<&str> {
        self.expected_hash.as_deref()
    }

    pub fn hasher(&self) -> &FileHasher {
        &self.hasher
    }

    pub fn store(&self) -> &CacheStore<C> {
        &self.store
    }

    fn report(&self, event: CacheEvent) {
        self.store.reporter().report(&event);
    }

    /// Decide hit or miss without running the computation
    pub fn lookup(&self) -> Lookup<T>
    where
        T: DeserializeOwned,
    {
        let actual_hash = self.hasher.compute_hash(&self.path, self.store.reporter());

        if self.expected_hash.as_deref() != Some(actual_hash.as_str()) {
            self.report(CacheEvent::HashMismatch {
                path: self.path.clone(),
                expected: self.expected_hash.clone(),
                actual: actual_hash.clone(),
            });
            return Lookup::Miss(MissReason::HashMismatch { actual_hash });
        }

        match self.store.load::<T>(&self.path) {
            Some(value) if (self.accept)(&value) => {
                self.report(CacheEvent::Loaded {
                    path: self.path.clone(),
                    hash: actual_hash,
                });
                Lookup::Hit(value)
            },
            Some(_) => {
                self.report(CacheEvent::Rejected {
                    path: self.path.clone(),
                    hash: actual_hash,
                });
                Lookup::Miss(MissReason::Rejected)
            },
            None => Lookup::Miss(MissReason::LoadFailed),
        }
    }

    /// Write a freshly computed value and report the hash it ended up with
    fn persist(&self, value: &T) -> bool
    where
        T: Serialize,
    {
        if !self.store.save(value, &self.path) {
            return false;
        }
        let hash = self.hasher.compute_hash(&self.path, self.store.reporter());
        self.report(CacheEvent::Saved {
            path: self.path.clone(),
            hash,
        });
        true
    }

    /// Return the cached value or compute, store and return a fresh one
    pub fn call<A>(&mut self, args: A) -> T
    where
        F: FnMut(A) -> T,
        T: Serialize + DeserializeOwned,
    {
        if let Lookup::Hit(value) = self.lookup() {
            return value;
        }
        let value = (self.compute)(args);
        self.persist(&value);
        value
    }

    /// Like [`Memoized::call`] for computations that can fail
    ///
    /// A computation error is returned unchanged and nothing is written.
    pub fn try_call<A, E>(&mut self, args: A) -> Result<T, E>
    where
        F: FnMut(A) -> Result<T, E>,
        T: Serialize + DeserializeOwned,
    {
        if let Lookup::Hit(value) = self.lookup() {
            return Ok(value);
        }
        let value = (self.compute)(args)?;
        self.persist(&value);
        Ok(value)
    }

    /// [`Memoized::call`] for computations without arguments
    pub fn get(&mut self) -> T
    where
        F: FnMut() -> T,
        T: Serialize + DeserializeOwned,
    {
        if let Lookup::Hit(value) = self.lookup() {
            return value;
        }
        let value = (self.compute)();
        self.persist(&value);
        value
    }
}
