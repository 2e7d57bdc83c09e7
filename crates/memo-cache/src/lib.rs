//! Hash-gated result memoization for memo
//!
//! This crate stores the output of a computation in a single file and, on
//! later calls, reuses it only when the file's content hash equals the hash
//! the caller expects. Every cache-layer failure degrades to recomputing.

pub mod codec;
pub mod memoize;
pub mod store;

// Re-export main types
pub use codec::{Codec, JsonCodec};
pub use memoize::{cached_call, Lookup, Memoized, MissReason, DEFAULT_CACHE_FILE};
pub use store::CacheStore;

pub use memo_core::{CacheEvent, EventKind, Reporter};
