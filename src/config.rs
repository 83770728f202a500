//! Configuration management for record-log

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::chunker::{ChunkMode, Chunker, DEFAULT_MAX_CHUNK_LENGTH};
use crate::logging::DEFAULT_MAX_FILE_SIZE;

/// Logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Name of the log directory under the storage root
    #[serde(default = "default_log_directory_name")]
    pub log_directory_name: String,

    /// Storage root; defaults to the user's documents directory
    #[serde(default)]
    pub storage_root: Option<PathBuf>,

    /// Maximum characters per body segment of a long message (default: 300)
    #[serde(default = "default_max_chunk_length")]
    pub max_chunk_length: usize,

    /// Size in bytes above which the active log file is rotated (default: 512 KiB)
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,

    /// Tag used when a log call gives none
    #[serde(default = "default_tag")]
    pub default_tag: String,

    /// Segment slicing: "exclusive" (default) or "legacy"
    #[serde(default)]
    pub chunk_mode: ChunkMode,

    /// Delete log files older than this many days at startup; unset keeps everything
    #[serde(default)]
    pub retention_days: Option<u64>,
}

fn default_log_directory_name() -> String {
    "LogDirectory".to_string()
}

fn default_max_chunk_length() -> usize {
    DEFAULT_MAX_CHUNK_LENGTH
}

fn default_max_file_size_bytes() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_tag() -> String {
    "Log".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_directory_name: default_log_directory_name(),
            storage_root: None,
            max_chunk_length: default_max_chunk_length(),
            max_file_size_bytes: default_max_file_size_bytes(),
            default_tag: default_tag(),
            chunk_mode: ChunkMode::default(),
            retention_days: None,
        }
    }
}

impl Config {
    /// Load configuration from the default path, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a file, or return default if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file, creating its parent directory
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Full path of the log directory
    pub fn log_directory(&self) -> PathBuf {
        let root = self.storage_root.clone().unwrap_or_else(documents_dir);
        root.join(&self.log_directory_name)
    }

    /// Chunker matching this configuration
    pub fn chunker(&self) -> Chunker {
        Chunker::new(self.max_chunk_length, self.chunk_mode)
    }
}

/// Get the user's documents directory
/// Falls back to the home directory, then to the current directory
pub fn documents_dir() -> PathBuf {
    try_documents_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine documents or home directory, using current directory");
        PathBuf::from(".")
    })
}

/// Try to get the user's documents directory, falling back to home
pub fn try_documents_dir() -> Option<PathBuf> {
    dirs::document_dir().or_else(dirs::home_dir)
}

/// Get the configuration directory (e.g. ~/.config/record-log)
/// Falls back to ./.record-log if no config directory can be determined
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("record-log"))
        .unwrap_or_else(|| PathBuf::from(".record-log"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
