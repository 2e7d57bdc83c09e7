//! memo.toml configuration parsing and serialization

use crate::ConfigResult;
use memo_core::error::MemoError;
use memo_core::types::WriteMode;
use memo_core::utils::hash::{FileHasher, HashAlgorithm, DEFAULT_CHUNK_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete memo.toml configuration
///
/// Every section is optional; a missing file or an empty one yields the
/// defaults below.
///
/// ```toml
/// [hash]
/// algorithm = "md5"
/// chunk_size = 1048576
///
/// [store]
/// write_mode = "atomic"
/// pretty = false
///
/// [policy]
/// recompute_on_empty = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemoConfig {
    /// Content hashing settings
    #[serde(default)]
    pub hash: HashSection,

    /// Cache file writing settings
    #[serde(default)]
    pub store: StoreSection,

    /// Hit/miss policy settings
    #[serde(default)]
    pub policy: PolicySection,
}

/// `[hash]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashSection {
    /// Digest algorithm
    #[serde(default)]
    pub algorithm: HashAlgorithm,

    /// Read block size in bytes
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

/// `[store]` section
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreSection {
    #[serde(default)]
    pub write_mode: WriteMode,

    /// Pretty-print JSON cache files
    #[serde(default)]
    pub pretty: bool,
}

/// `[policy]` section
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicySection {
    /// Treat an empty loaded value as a cache miss
    #[serde(default)]
    pub recompute_on_empty: bool,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for HashSection {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl MemoConfig {
    /// Build the file hasher described by the `[hash]` section
    pub fn hasher(&self) -> ConfigResult<FileHasher> {
        FileHasher::new(self.hash.algorithm)
            .with_chunk_size(self.hash.chunk_size)
            .map_err(|_| chunk_size_error())
    }
}

fn chunk_size_error() -> MemoError {
    MemoError::ConfigValidation {
        field: "hash.chunk_size".to_string(),
        reason: "must be greater than zero".to_string(),
    }
}

/// Parse TOML string to MemoConfig
pub fn parse_memo_toml(content: &str) -> ConfigResult<MemoConfig> {
    let config: MemoConfig = toml::from_str(content).map_err(|e| MemoError::TomlParse {
        message: format!("TOML parsing error: {}", e),
    })?;

    validate_config(&config)?;

    Ok(config)
}

/// Serialize MemoConfig to TOML string
pub fn serialize_memo_toml(config: &MemoConfig) -> ConfigResult<String> {
    toml::to_string_pretty(config).map_err(|e| MemoError::TomlParse {
        message: format!("TOML serialization error: {}", e),
    })
}

/// Validate configuration values
pub fn validate_config(config: &MemoConfig) -> ConfigResult<()> {
    if config.hash.chunk_size == 0 {
        return Err(chunk_size_error());
    }
    Ok(())
}

/// Load and parse memo.toml from file path
pub fn load_from_file(path: &Path) -> ConfigResult<MemoConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| MemoError::io(format!("Failed to read {}", path.display()), e))?;

    parse_memo_toml(&content).map_err(|e| match e {
        MemoError::TomlParse { message } => MemoError::TomlParse {
            message: format!("In file {}: {}", path.display(), message),
        },
        MemoError::ConfigValidation { field, reason } => MemoError::ConfigValidation {
            field,
            reason: format!("in file {}: {}", path.display(), reason),
        },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_memo_toml("").unwrap();
        assert_eq!(config, MemoConfig::default());
        assert_eq!(config.hash.algorithm, HashAlgorithm::Md5);
        assert_eq!(config.hash.chunk_size, 1 << 20);
        assert_eq!(config.store.write_mode, WriteMode::Atomic);
        assert!(!config.policy.recompute_on_empty);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[hash]
algorithm = "blake3"
chunk_size = 4096

[store]
write_mode = "direct"
pretty = true

[policy]
recompute_on_empty = true
"#;
        let config = parse_memo_toml(toml).unwrap();
        assert_eq!(config.hash.algorithm, HashAlgorithm::Blake3);
        assert_eq!(config.hash.chunk_size, 4096);
        assert_eq!(config.store.write_mode, WriteMode::Direct);
        assert!(config.store.pretty);
        assert!(config.policy.recompute_on_empty);

        let hasher = config.hasher().unwrap();
        assert_eq!(hasher.chunk_size(), 4096);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let err = parse_memo_toml("[hash]\nchunk_size = 0\n").unwrap_err();
        assert!(matches!(err, MemoError::ConfigValidation { .. }));
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let err = parse_memo_toml("[hash]\nalgorithm = \"crc32\"\n").unwrap_err();
        assert!(matches!(err, MemoError::TomlParse { .. }));
    }

    #[test]
    fn test_round_trip_serialization() {
        let mut config = MemoConfig::default();
        config.hash.algorithm = HashAlgorithm::Sha256;
        config.policy.recompute_on_empty = true;

        let text = serialize_memo_toml(&config).unwrap();
        assert_eq!(parse_memo_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_file_names_the_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("memo.toml");
        std::fs::write(&path, "[hash\n").unwrap();

        let err = load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("memo.toml"));
    }
}
