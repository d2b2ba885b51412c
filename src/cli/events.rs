//! Event types for the Claude Code stream-json protocol.
//!
//! Claude Code, run with `--input-format stream-json --output-format
//! stream-json`, reads one user turn per stdin line and writes one JSON event
//! per stdout line. Only two event types matter to the bridge:
//!
//! - `assistant`: carries `message.content`, an ordered list of typed blocks.
//! - `result`: the terminal event, with `is_error`, `result` and `session_id`.
//!
//! Everything else (`system`, `user` echoes, stream deltas) is ignored.

use serde::{Deserialize, Serialize};

/// A content block inside an assistant message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain assistant text.
    Text {
        #[serde(default)]
        text: String,
    },
    /// Thinking, tool use and anything else.
    #[serde(other)]
    Other,
}

/// The `message` payload of an assistant event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

impl AssistantMessage {
    /// Concatenate the text blocks in arrival order.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect()
    }
}

/// Final result event data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultEvent {
    /// Result subtype (e.g., "success", "`error_during_execution`").
    #[serde(default)]
    pub subtype: Option<String>,
    /// Whether the run ended in error.
    #[serde(default)]
    pub is_error: bool,
    /// Final text on success, or the error message on failure.
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    /// Alternate error field used by some CLI versions.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    /// Session identifier for `--resume`.
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ResultEvent {
    /// The `result` field, if it is a string.
    #[must_use]
    pub fn result_text(&self) -> Option<&str> {
        self.result.as_ref().and_then(serde_json::Value::as_str)
    }

    /// The error text: `result` first, then `error`.
    #[must_use]
    pub fn error_text(&self) -> Option<&str> {
        self.result_text()
            .filter(|text| !text.is_empty())
            .or_else(|| self.error.as_ref().and_then(serde_json::Value::as_str))
    }
}

/// Raw events emitted by Claude Code on stdout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Assistant turn (possibly partial).
    Assistant {
        #[serde(default)]
        message: AssistantMessage,
    },
    /// Final result event.
    Result(ResultEvent),
    /// Catch-all for unknown event types.
    #[serde(other)]
    Unknown,
}

impl StreamEvent {
    /// Returns true if this is a terminal event (Result).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Result(_))
    }

    /// Map the wire event onto what the bridge acts on.
    #[must_use]
    pub fn classify(self) -> BridgeEvent {
        match self {
            Self::Assistant { message } => BridgeEvent::TextChunk(message.text()),
            Self::Result(result) => BridgeEvent::Terminal(Terminal::from(result)),
            Self::Unknown => BridgeEvent::Unrecognized,
        }
    }
}

/// Terminal status reported by a result event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Terminal {
    pub is_error: bool,
    /// Error text when `is_error`, otherwise the final result text.
    pub result_text: Option<String>,
    /// Only reported for successful runs.
    pub session_id: Option<String>,
}

impl From<ResultEvent> for Terminal {
    fn from(event: ResultEvent) -> Self {
        if event.is_error {
            Self {
                is_error: true,
                result_text: event.error_text().map(str::to_string),
                session_id: None,
            }
        } else {
            Self {
                is_error: false,
                result_text: event.result_text().map(str::to_string),
                session_id: event.session_id,
            }
        }
    }
}

/// The closed set of events the bridge reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// Partial assistant output; order-significant.
    TextChunk(String),
    /// The run finished.
    Terminal(Terminal),
    /// Anything else; ignored.
    Unrecognized,
}

/// One user turn written to Claude's stdin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTurn {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: OutboundMessage,
}

/// A conversation message sent to the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub role: String,
    pub content: String,
}

impl OutboundMessage {
    /// A user message with the given text.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Wrap as a stream-json user turn.
    #[must_use]
    pub fn to_turn(&self) -> UserTurn {
        UserTurn {
            kind: "user".to_string(),
            message: self.clone(),
        }
    }
}
