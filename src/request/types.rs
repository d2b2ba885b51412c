//! Host input and request types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::bridge::BridgeError;

/// What the CLI is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// A short encouragement message.
    Cheer,
    /// Search the supplied records.
    Search,
    /// Let the CLI read history files under a folder.
    Deepsearch,
}

impl Mode {
    /// Whether the assistant output is itself a JSON document.
    #[must_use]
    pub fn is_structured(self) -> bool {
        matches!(self, Self::Search | Self::Deepsearch)
    }
}

/// Which host entry point was invoked; decides the default mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    Cheer,
    Search,
}

impl EntryPoint {
    /// Mode used when the host input does not name one.
    #[must_use]
    pub fn default_mode(self) -> Mode {
        match self {
            Self::Cheer => Mode::Cheer,
            Self::Search => Mode::Search,
        }
    }
}

/// Prompt language. Anything other than `ja` is English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Ja,
    En,
}

impl From<&str> for Language {
    fn from(code: &str) -> Self {
        if code == "ja" {
            Self::Ja
        } else {
            Self::En
        }
    }
}

/// History source name whose logs get the detailed deepsearch prompt.
pub const CLAUDE_SOURCE: &str = "claude";

/// The JSON object the host writes to stdin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostInput {
    #[serde(default)]
    pub mode: Option<Mode>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    /// History records, passed through opaquely. `null` means none.
    #[serde(default)]
    pub blocks: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub folder_path: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub project_path: Option<String>,
}

impl HostInput {
    /// Parse the raw stdin contents.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::EmptyInput` for blank input and
    /// `BridgeError::Input` if it is not a valid input object.
    pub fn parse(raw: &str) -> Result<Self, BridgeError> {
        if raw.trim().is_empty() {
            return Err(BridgeError::EmptyInput);
        }
        serde_json::from_str(raw).map_err(|e| BridgeError::Input(e.to_string()))
    }
}

/// One fully resolved request. Built once per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub mode: Mode,
    pub language: Language,
    pub session_id: Option<String>,
    pub query: String,
    pub records: Vec<serde_json::Value>,
    pub folder_path: Option<PathBuf>,
    pub source: Option<String>,
    pub project_path: Option<String>,
}

impl Request {
    /// Resolve host input against the entry point's defaults.
    ///
    /// Empty strings are treated as absent.
    #[must_use]
    pub fn from_input(entry: EntryPoint, input: HostInput) -> Self {
        Self {
            mode: input.mode.unwrap_or_else(|| entry.default_mode()),
            language: input
                .language
                .as_deref()
                .map(Language::from)
                .unwrap_or_default(),
            session_id: non_empty(input.session_id),
            query: input.query.unwrap_or_default(),
            records: input.blocks.unwrap_or_default(),
            folder_path: non_empty(input.folder_path).map(PathBuf::from),
            source: non_empty(input.source),
            project_path: non_empty(input.project_path),
        }
    }

    /// Whether the deepsearch target is a Claude Code log folder.
    #[must_use]
    pub fn is_claude_source(&self) -> bool {
        self.source.as_deref() == Some(CLAUDE_SOURCE)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
