//! The single JSON line written back to the host.

use serde::Serialize;
use serde_json::Value;

use crate::bridge::{BridgeError, Completion};
use crate::request::Mode;

/// What the host receives on stdout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// Free-text reply (cheer).
    Message {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
    },
    /// The assistant's JSON document (search modes).
    Structured(Value),
    /// Any failure.
    Error { error: String },
}

impl Response {
    /// Shape a completed run for the host.
    ///
    /// In structured modes the message must contain a JSON object; in
    /// `search` mode candidates whose `block` is not one of `records` are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::Schema` if no JSON object can be located.
    pub fn from_completion(
        mode: Mode,
        completion: Completion,
        records: &[Value],
    ) -> Result<Self, BridgeError> {
        match mode {
            Mode::Cheer => Ok(Self::Message {
                message: completion.message,
                session_id: completion.session_id,
            }),
            Mode::Search => {
                let mut payload = extract_json(&completion.message).ok_or(BridgeError::Schema)?;
                let dropped = retain_verbatim_candidates(&mut payload, records);
                if dropped > 0 {
                    tracing::warn!(dropped, "Dropped candidates not copied from the input blocks");
                }
                Ok(Self::Structured(payload))
            }
            Mode::Deepsearch => extract_json(&completion.message)
                .map(Self::Structured)
                .ok_or(BridgeError::Schema),
        }
    }

    #[must_use]
    pub fn error(err: &BridgeError) -> Self {
        Self::Error {
            error: err.to_string(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Serialize as one line of JSON.
    #[must_use]
    pub fn to_line(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"error":"Failed to encode response"}"#.to_string())
    }
}

impl From<Result<Response, BridgeError>> for Response {
    fn from(result: Result<Response, BridgeError>) -> Self {
        result.unwrap_or_else(|err| Self::error(&err))
    }
}

/// Find the JSON object in assistant text.
///
/// Tries the whole text first, then the span from the first `{` to the last
/// `}` so prose or code fences around the object are tolerated.
#[must_use]
pub fn extract_json(text: &str) -> Option<Value> {
    let text = text.trim();
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

/// Keep only candidates whose `block` equals one of `records`.
///
/// Matching blocks are replaced by the input record itself so the host gets
/// its own object back. Candidates without a `block` are kept. Returns the
/// number of candidates dropped.
pub fn retain_verbatim_candidates(payload: &mut Value, records: &[Value]) -> usize {
    let Some(candidates) = payload.get_mut("candidates").and_then(Value::as_array_mut) else {
        return 0;
    };

    let before = candidates.len();
    candidates.retain_mut(|candidate| {
        let Some(block) = candidate.get_mut("block") else {
            return true;
        };
        match records.iter().find(|record| *record == block) {
            Some(record) => {
                block.clone_from(record);
                true
            }
            None => false,
        }
    });
    before - candidates.len()
}
