//! Configuration lookup, layering, and environment overrides

use crate::toml::{load_from_file, validate_config, MemoConfig};
use crate::{ConfigResult, CONFIG_FILE};
use memo_core::error::MemoError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of environment variables that override memo.toml
pub const ENV_PREFIX: &str = "MEMO_";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Directory the lookup starts from
    cwd: PathBuf,
}

/// Configuration layering and merging
pub struct ConfigLayering;

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// A memo.toml file
    File(PathBuf),
    /// No file was found; built-in defaults
    Defaults,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    /// Find memo.toml, walking up from the starting directory
    pub fn resolve_config_path(&self) -> Option<PathBuf> {
        let mut current: &Path = &self.cwd;

        loop {
            let config_path = current.join(CONFIG_FILE);
            if config_path.is_file() {
                return Some(config_path);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    /// Load the nearest memo.toml, falling back to defaults
    pub fn load_file_config(&self) -> ConfigResult<(MemoConfig, ConfigSource)> {
        match self.resolve_config_path() {
            Some(path) => {
                debug!(path = %path.display(), "loading memo configuration");
                let config = load_from_file(&path)?;
                Ok((config, ConfigSource::File(path)))
            },
            None => Ok((MemoConfig::default(), ConfigSource::Defaults)),
        }
    }

    /// Load the nearest memo.toml and apply `MEMO_*` environment overrides
    pub fn load(&self) -> ConfigResult<(MemoConfig, ConfigSource)> {
        let (config, source) = self.load_file_config()?;
        let merged = ConfigLayering::merge(config, &ConfigLayering::collect_env_overrides())?;
        Ok((merged, source))
    }
}

impl ConfigLayering {
    /// Apply environment overrides on top of a file configuration
    pub fn merge(
        file_config: MemoConfig,
        env_overrides: &HashMap<String, String>,
    ) -> ConfigResult<MemoConfig> {
        let mut merged = file_config;
        Self::apply_env_overrides(&mut merged, env_overrides)?;
        validate_config(&merged)?;
        Ok(merged)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(
        config: &mut MemoConfig,
        overrides: &HashMap<String, String>,
    ) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "MEMO_HASH_ALGORITHM" => {
                    config.hash.algorithm = value.parse()?;
                },
                "MEMO_CHUNK_SIZE" => {
                    config.hash.chunk_size =
                        value.trim().parse().map_err(|e| MemoError::ConfigValidation {
                            field: key.clone(),
                            reason: format!("Invalid chunk size '{}': {}", value, e),
                        })?;
                },
                "MEMO_WRITE_MODE" => {
                    config.store.write_mode = value.parse()?;
                },
                "MEMO_PRETTY" => {
                    config.store.pretty = parse_flag(key, value)?;
                },
                "MEMO_RECOMPUTE_ON_EMPTY" => {
                    config.policy.recompute_on_empty = parse_flag(key, value)?;
                },
                _ => {
                    // Unknown environment variable, ignore
                },
            }
        }

        Ok(())
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect()
    }
}

fn parse_flag(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(MemoError::ConfigValidation {
            field: key.to_string(),
            reason: format!("expected a boolean, got '{}'", other),
        }),
    }
}
