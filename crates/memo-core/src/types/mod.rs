//! Small types shared by the memo crates.
//!
//! - `WriteMode`: how cache files are written
//! - `Truthy`: the legacy "empty value counts as a miss" test

pub mod truthy;

pub use truthy::Truthy;

use crate::error::MemoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a cache file is written to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Write a sibling temp file, then rename it over the target
    #[default]
    Atomic,
    /// Truncate and write the target in place
    Direct,
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteMode::Atomic => f.write_str("atomic"),
            WriteMode::Direct => f.write_str("direct"),
        }
    }
}

impl FromStr for WriteMode {
    type Err = MemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic" => Ok(WriteMode::Atomic),
            "direct" => Ok(WriteMode::Direct),
            other => Err(MemoError::ConfigValidation {
                field: "write_mode".to_string(),
                reason: format!("expected 'atomic' or 'direct', got '{}'", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_mode_parse() {
        assert_eq!("Atomic".parse::<WriteMode>().unwrap(), WriteMode::Atomic);
        assert_eq!("direct".parse::<WriteMode>().unwrap(), WriteMode::Direct);
        assert!("sometimes".parse::<WriteMode>().is_err());
        assert_eq!(WriteMode::default().to_string(), "atomic");
    }
}
