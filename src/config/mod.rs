//! Configuration management for paisano
//!
//! This module handles loading, parsing, and managing configuration:
//! - Configuration file (TOML format)
//! - Command-line arguments (applied by the CLI on top of the file)
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::parser::BRANDED_REGISTRY;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Completion cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Evaluator configuration
    #[serde(default)]
    pub nix: NixConfig,

    /// Registry names offered after `#` during completion
    #[serde(default = "default_registries")]
    pub registries: Vec<WellKnownRegistry>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Completion cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    /// Directory holding cached registry trees
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

/// Evaluator configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NixConfig {
    /// Name or path of the `nix` binary
    #[serde(default = "default_nix_binary")]
    pub binary: String,

    /// System to evaluate for; detected from the evaluator when unset
    #[serde(default)]
    pub system: Option<String>,
}

/// A registry name worth suggesting, with a description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WellKnownRegistry {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

// Default value functions
fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    false
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("paisano")
}

fn default_nix_binary() -> String {
    "nix".to_string()
}

fn default_registries() -> Vec<WellKnownRegistry> {
    vec![WellKnownRegistry {
        name: BRANDED_REGISTRY.to_string(),
        description: "Custom branded registry (github:divnix/std)".to_string(),
    }]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            cache: CacheConfig::default(),
            nix: NixConfig::default(),
            registries: default_registries(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

impl Default for NixConfig {
    fn default() -> Self {
        Self {
            binary: default_nix_binary(),
            system: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file, or the default location
    ///
    /// A missing file at the default location yields the default
    /// configuration; an explicitly requested file must exist.
    ///
    /// # Arguments
    /// * `path` - Explicit configuration file, if any
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_config_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigError::FileNotFound(path.display().to_string()).into());
            }
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::new());
        }

        let text = std::fs::read_to_string(&path)?;
        Self::from_toml(&text)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - `$XDG_CONFIG_HOME/paisano/config.toml` or platform equivalent
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("paisano")
            .join("config.toml")
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if self.nix.binary.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "nix.binary".to_string(),
                value: self.nix.binary.clone(),
            }
            .into());
        }

        if self.cache.dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "cache.dir".to_string(),
                value: String::new(),
            }
            .into());
        }

        // A registry name ends at the first '/' of a target spec.
        if let Some(bad) = self
            .registries
            .iter()
            .find(|r| r.name.is_empty() || r.name.contains(['/', '#']))
        {
            return Err(ConfigError::InvalidValue {
                field: "registries.name".to_string(),
                value: bad.name.clone(),
            }
            .into());
        }

        Ok(())
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::new();
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.nix.binary, "nix");
        assert_eq!(config.registries[0].name, BRANDED_REGISTRY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = Config::from_toml(
            r#"
            [logging]
            level = "debug"

            [[registries]]
            name = "__rebranded"
            description = "our own"
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.nix.binary, "nix");
        assert_eq!(config.registries.len(), 1);
        assert_eq!(config.registries[0].name, "__rebranded");
    }

    #[test]
    fn test_empty_toml_keeps_default_registries() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.registries, default_registries());
    }

    #[test]
    fn test_invalid_registry_name() {
        let mut config = Config::new();
        config.registries.push(WellKnownRegistry {
            name: "bad/name".to_string(),
            description: String::new(),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::new();
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load_from_file(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[nix]\nbinary = \"/run/current-system/sw/bin/nix\"\n").unwrap();

        let config = Config::load_from_file(Some(&path)).unwrap();
        assert_eq!(config.nix.binary, "/run/current-system/sw/bin/nix");
    }
}
