//! memo benchmarking suite
//!
//! Benchmarks for chunked file hashing and for the hit and miss paths of
//! the memoization wrapper.

pub mod common;

pub use common::*;
