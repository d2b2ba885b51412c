//! Configuration file loader.

use std::path::{Path, PathBuf};

use super::BridgeConfig;

/// Configuration loader that searches multiple locations.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Search paths in order of priority.
    search_paths: Vec<PathBuf>,
    /// Set for `--config`; the file must then exist.
    explicit: bool,
}

impl ConfigLoader {
    /// Create a new config loader with default search paths.
    #[must_use]
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        // 1. Current directory: .claude-bridge.toml
        search_paths.push(PathBuf::from(".claude-bridge.toml"));

        // 2. User config directory: ~/.config/claude-bridge/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("claude-bridge").join("config.toml"));
        }

        Self {
            search_paths,
            explicit: false,
        }
    }

    /// Create a config loader with a specific config file path.
    ///
    /// Unlike the default search, a missing file is an error.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
            explicit: true,
        }
    }

    /// Load configuration from the first available file, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed, or if
    /// an explicit path does not exist.
    pub fn load(&self) -> Result<BridgeConfig, ConfigError> {
        for path in &self.search_paths {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading config file");
                return Self::load_from_path(path);
            }
            if self.explicit {
                return Err(ConfigError::NotFound { path: path.clone() });
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(BridgeConfig::default())
    }

    fn load_from_path(path: &Path) -> Result<BridgeConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the search paths for debugging.
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}
