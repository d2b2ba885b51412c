//! Stream parser for Claude Code stdout.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::cli::StreamEvent;

/// Error type for stream operations.
#[derive(thiserror::Error, Debug)]
pub enum StreamError {
    #[error("Failed to read stdout: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Empty line")]
    EmptyLine,
}

impl StreamError {
    /// Whether the stream can continue past this error.
    ///
    /// A single malformed line never aborts the stream.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

/// Parse a single line of stream-json output.
///
/// # Errors
///
/// Returns `StreamError::EmptyLine` for blank lines and
/// `StreamError::ParseError` if the JSON is invalid.
pub fn parse_event(line: &str) -> Result<StreamEvent, StreamError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(StreamError::EmptyLine);
    }
    let event: StreamEvent = serde_json::from_str(line)?;
    Ok(event)
}

/// Read events from a stream-json byte source until end-of-stream.
///
/// Lines are decoded lossily, so invalid UTF-8 only affects the line it
/// appears on. An I/O error is yielded once and ends the stream.
pub fn read_events<R>(
    source: R,
) -> impl futures_core::Stream<Item = Result<StreamEvent, StreamError>>
where
    R: AsyncRead + Unpin,
{
    let reader = BufReader::new(source);

    futures_util::stream::unfold(Some(reader), |state| async move {
        let mut reader = state?;
        let mut buf = Vec::new();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => None,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                Some((parse_event(&line), Some(reader)))
            }
            Err(e) => Some((Err(StreamError::Io(e)), None)),
        }
    })
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;

    use super::*;

    #[test]
    fn parse_line_trims_newline() {
        let event = parse_event("{\"type\":\"result\",\"is_error\":false}\r\n").unwrap();
        assert!(event.is_terminal());
    }

    #[test]
    fn parse_line_whitespace_only() {
        assert!(matches!(parse_event("  \t "), Err(StreamError::EmptyLine)));
    }

    #[test]
    fn parse_line_invalid_json() {
        let err = parse_event("not valid json at all").unwrap_err();
        assert!(matches!(err, StreamError::ParseError(_)));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn read_events_yields_every_line() {
        let input: &[u8] = b"{\"type\":\"system\"}\ngarbage\n\n{\"type\":\"result\",\"is_error\":false}";
        let items: Vec<_> = read_events(input).collect().await;

        assert_eq!(items.len(), 4);
        assert!(matches!(items[0], Ok(StreamEvent::Unknown)));
        assert!(matches!(items[1], Err(StreamError::ParseError(_))));
        assert!(matches!(items[2], Err(StreamError::EmptyLine)));
        assert!(matches!(items[3], Ok(StreamEvent::Result(_))));
    }

    #[tokio::test]
    async fn read_events_tolerates_invalid_utf8() {
        let mut input = b"\xff\xfe broken\n".to_vec();
        input.extend_from_slice(b"{\"type\":\"assistant\",\"message\":{\"content\":[{\"type\":\"text\",\"text\":\"ok\"}]}}\n");
        let items: Vec<_> = read_events(input.as_slice()).collect().await;

        assert_eq!(items.len(), 2);
        assert!(items[0].is_err());
        assert!(matches!(items[1], Ok(StreamEvent::Assistant { .. })));
    }
}
