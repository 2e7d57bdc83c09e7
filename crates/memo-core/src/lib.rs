//! # memo-core
//!
//! Core types and utilities shared across all memo crates.
//!
//! This crate provides:
//! - `MemoError` for unified error handling
//! - Streaming file hashing with a sentinel for unreadable files
//! - The `Reporter` capability that receives cache events
//! - Small shared types (`WriteMode`, `Truthy`)
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `error`: Error types and result aliases
//! - `report`: Cache events and reporter implementations
//! - `types`: Shared configuration types
//! - `utils`: Hashing helpers
//! - `logging`: tracing subscriber setup

pub mod error;
pub mod logging;
pub mod report;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{MemoError, MemoResult};
pub use report::{CacheEvent, EventKind, NullReporter, RecordingReporter, Reporter, TracingReporter};
pub use types::{Truthy, WriteMode};
pub use utils::hash::{
    compute_hash, hash_bytes, FileHasher, HashAlgorithm, DEFAULT_CHUNK_SIZE, SENTINEL_HASH,
};
