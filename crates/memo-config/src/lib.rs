//! Configuration parsing for memo
//!
//! This crate handles parsing and validation of `memo.toml` and layers
//! `MEMO_*` environment variables on top of it.

pub mod merge;
pub mod toml;

// Re-export main types
pub use merge::{ConfigLayering, ConfigLoader, ConfigSource};
pub use self::toml::{HashSection, MemoConfig, PolicySection, StoreSection};

use memo_core::error::MemoError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, MemoError>;

/// Name of the configuration file looked up by [`ConfigLoader`]
pub const CONFIG_FILE: &str = "memo.toml";
