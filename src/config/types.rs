//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Model used when neither the environment nor the config names one.
pub const DEFAULT_MODEL: &str = "claude-opus-4-5-20251101";

/// Environment variable overriding the cheer model.
pub const CHEER_MODEL_ENV: &str = "CHEER_MODEL";

/// Environment variable overriding the history search model.
pub const SEARCH_MODEL_ENV: &str = "HISTORY_SEARCH_MODEL";

/// Entry-point marker variable read by Claude Code.
pub const ENTRYPOINT_ENV: &str = "CLAUDE_CODE_ENTRYPOINT";

/// Settings for locating and running the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    /// Explicit executable; skips the search when set.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Extra fallback locations, checked after the built-in ones.
    #[serde(default)]
    pub extra_fallbacks: Vec<PathBuf>,
    /// How long to wait for exit once stdout has closed.
    #[serde(default = "default_exit_timeout_ms")]
    pub exit_timeout_ms: u64,
}

fn default_exit_timeout_ms() -> u64 {
    5000
}

impl CliConfig {
    /// The post-EOF exit wait as a `Duration`.
    #[must_use]
    pub fn exit_timeout(&self) -> Duration {
        Duration::from_millis(self.exit_timeout_ms)
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            path: None,
            extra_fallbacks: Vec::new(),
            exit_timeout_ms: default_exit_timeout_ms(),
        }
    }
}

/// Environment applied to the child process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvConfig {
    /// Value for `CLAUDE_CODE_ENTRYPOINT`.
    #[serde(default = "default_entrypoint")]
    pub entrypoint: String,
    /// Variables removed from the inherited environment.
    #[serde(default = "default_remove")]
    pub remove: Vec<String>,
}

fn default_entrypoint() -> String {
    "sdk-rust".to_string()
}

fn default_remove() -> Vec<String> {
    vec!["ANTHROPIC_API_KEY".to_string()]
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            entrypoint: default_entrypoint(),
            remove: default_remove(),
        }
    }
}

/// Default models per entry point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    #[serde(default = "default_model")]
    pub cheer: String,
    #[serde(default = "default_model")]
    pub search: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            cheer: default_model(),
            search: default_model(),
        }
    }
}

/// Top-level bridge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BridgeConfig {
    #[serde(default)]
    pub cli: CliConfig,
    #[serde(default)]
    pub env: EnvConfig,
    #[serde(default)]
    pub models: ModelConfig,
}
