//! Bridge error types.
//!
//! The `Display` text of each variant is the `error` string returned to the
//! host, so it names the failure class without echoing host input.

use crate::cli::{LocateError, SpawnError};
use crate::config::ConfigError;

/// Errors that end an invocation.
#[derive(thiserror::Error, Debug)]
pub enum BridgeError {
    /// Host wrote nothing.
    #[error("Empty stdin")]
    EmptyInput,

    /// Host input was not a valid request object.
    #[error("Failed to read stdin: {0}")]
    Input(String),

    /// The config file exists but is unusable.
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),

    /// No Claude executable was found.
    #[error("Claude CLI not found")]
    ToolNotFound(#[from] LocateError),

    /// The executable could not be started.
    #[error("Failed to start Claude CLI: {0}")]
    Spawn(#[from] SpawnError),

    /// Sending the conversation failed.
    #[error("Failed to write stdin: {0}")]
    Write(#[source] std::io::Error),

    /// The CLI exited with an error.
    #[error("CLI error: {0}")]
    Process(String),

    /// The CLI exited cleanly without producing anything.
    #[error("CLI error: empty response")]
    EmptyResult,

    /// Structured output was not locatable JSON.
    #[error("Invalid response")]
    Schema,
}

impl BridgeError {
    /// Short class name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyInput | Self::Input(_) => "input",
            Self::Config(_) => "config",
            Self::ToolNotFound(_) => "tool_not_found",
            Self::Spawn(_) => "spawn",
            Self::Write(_) => "write",
            Self::Process(_) => "process",
            Self::EmptyResult => "empty_result",
            Self::Schema => "schema",
        }
    }
}
