//! Tests for stream-json parsing.

use claude_bridge::cli::{parse_event, BridgeEvent, StreamError, StreamEvent, Terminal};

#[test]
fn parse_line_assistant_text() {
    let line = r#"{"type":"assistant","message":{"id":"msg_1","role":"assistant","content":[{"type":"text","text":"Hello"}]}}"#;
    let event = parse_event(line).unwrap();

    assert_eq!(event.classify(), BridgeEvent::TextChunk("Hello".to_string()));
}

#[test]
fn parse_line_assistant_without_content() {
    let event = parse_event(r#"{"type":"assistant","message":{}}"#).unwrap();
    assert_eq!(event.classify(), BridgeEvent::TextChunk(String::new()));
}

#[test]
fn parse_line_result_success() {
    let line = r#"{"type":"result","subtype":"success","is_error":false,"duration_ms":1200,"num_turns":1,"result":"done","session_id":"abc"}"#;
    let event = parse_event(line).unwrap();

    assert!(event.is_terminal());
    assert_eq!(
        event.classify(),
        BridgeEvent::Terminal(Terminal {
            is_error: false,
            result_text: Some("done".to_string()),
            session_id: Some("abc".to_string()),
        })
    );
}

#[test]
fn parse_line_result_missing_is_error_defaults_to_success() {
    let event = parse_event(r#"{"type":"result","result":"ok"}"#).unwrap();
    let BridgeEvent::Terminal(terminal) = event.classify() else {
        panic!("Expected Terminal");
    };
    assert!(!terminal.is_error);
}

#[test]
fn parse_line_unknown_types() {
    for line in [
        r#"{"type":"system","subtype":"init","session_id":"s","tools":[]}"#,
        r#"{"type":"user","message":{"role":"user","content":"hi"}}"#,
        r#"{"type":"stream_event","event":{}}"#,
    ] {
        let event = parse_event(line).unwrap();
        assert!(matches!(event, StreamEvent::Unknown), "{line}");
        assert_eq!(event.classify(), BridgeEvent::Unrecognized);
    }
}

#[test]
fn parse_line_missing_type_is_parse_error() {
    let err = parse_event(r#"{"message":"no discriminator"}"#).unwrap_err();
    assert!(matches!(err, StreamError::ParseError(_)));
    assert!(err.is_recoverable());
}

#[test]
fn parse_line_truncated_json() {
    let err = parse_event(r#"{"type":"assistant","message":{"content":["#).unwrap_err();
    assert!(matches!(err, StreamError::ParseError(_)));
}
