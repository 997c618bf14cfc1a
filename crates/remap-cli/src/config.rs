//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON/TOML)
//! - Environment variables
//! - Command-line arguments

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use remap_core::EngineConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings passed through to the mapping and streaming engines
    pub engine: EngineConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used when `--output` is not given
    pub format: OutputFormat,

    /// Use colored output when the terminal supports it
    pub color: bool,

    /// Show progress bars for streamed files
    pub progress: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when neither `-v` nor `RUST_LOG` is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Log format (compact, full, json)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Log file path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Per-module level overrides, e.g. `remap_core: debug`
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub modules: HashMap<String, String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
            progress: true,
        }
    }
}

/// On-disk formats, selected by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
    Toml,
}

impl FileFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            Some("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config: Config = match FileFormat::of(path) {
            FileFormat::Yaml => serde_yaml::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)
                .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?,
            FileFormat::Json => serde_json::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in &Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // Current directory
        for name in [".remap.yaml", ".remap.json", ".remap.toml"] {
            paths.push(PathBuf::from(name));
        }

        // User config directory
        if let Some(config_dir) = dirs::config_dir() {
            let remap_dir = config_dir.join("remap");
            for name in ["config.yaml", "config.json", "config.toml"] {
                paths.push(remap_dir.join(name));
            }
        }

        // Home directory
        if let Some(home_dir) = dirs::home_dir() {
            for name in [".remap.yaml", ".remap.json", ".remap.toml"] {
                paths.push(home_dir.join(name));
            }
        }

        paths
    }

    /// Check values the engine would otherwise reject at run time
    pub fn validate(&self) -> Result<()> {
        self.engine
            .validate()
            .map_err(|e| Error::config(e.to_string()))
    }

    /// Serialize in the format selected by the path's extension
    pub fn to_string_for(&self, path: &Path) -> Result<String> {
        match FileFormat::of(path) {
            FileFormat::Yaml => Ok(serde_yaml::to_string(self)?),
            FileFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e))),
            FileFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_string_for(path)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Builder for creating configurations programmatically
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new config builder
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the key holding batch records
    pub fn collection_key(mut self, key: impl Into<String>) -> Self {
        self.config.engine.batch.collection_key = key.into();
        self
    }

    /// Set the key transformed records are written under
    pub fn output_key(mut self, key: impl Into<String>) -> Self {
        self.config.engine.batch.output_key = key.into();
        self
    }

    /// Set the streaming read buffer size
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.config.engine.stream.chunk_size = chunk_size;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
