//! Utility functions and helpers.
//!
//! Common functionality used across multiple memo crates.

pub mod hash;

// Re-export commonly used utilities
pub use hash::{compute_hash, hash_bytes, FileHasher, HashAlgorithm};
