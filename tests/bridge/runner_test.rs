//! Tests for the process bridge, using `/bin/sh -c` as a fake Claude CLI.
//!
//! Every script consumes stdin first so the bridge's write never races the
//! script's exit, except the one that closes stdin on purpose.

#![cfg(unix)]

use std::path::PathBuf;
use std::time::{Duration, Instant};

use claude_bridge::bridge::{Bridge, BridgeError, ProcessExit};
use claude_bridge::cli::{EnvPolicy, OutboundMessage};
use claude_bridge::request::Invocation;
use tokio_test::{assert_err, assert_ok};

const ASSISTANT_A: &str =
    r#"{"type":"assistant","message":{"content":[{"type":"text","text":"A"}]}}"#;
const ASSISTANT_B: &str =
    r#"{"type":"assistant","message":{"content":[{"type":"text","text":"B"}]}}"#;

fn sh(script: &str, extra: &[&str]) -> Invocation {
    let mut args = vec!["-c".to_string(), script.to_string(), "fake-claude".to_string()];
    args.extend(extra.iter().map(|a| (*a).to_string()));
    Invocation {
        args,
        messages: vec![OutboundMessage::user("hi")],
        allow_filesystem_tools: false,
        working_dir: std::env::temp_dir(),
        env: EnvPolicy::default(),
    }
}

/// A script that drains stdin, prints `lines`, and exits with `code`.
fn replay(lines: &[&str], code: i32) -> Invocation {
    let quoted: Vec<String> = lines.iter().map(|l| format!("'{l}'")).collect();
    let script = format!(
        "cat >/dev/null; printf '%s\\n' {}; exit {code}",
        quoted.join(" ")
    );
    sh(&script, &[])
}

fn bridge() -> Bridge {
    Bridge::new("/bin/sh")
}

#[tokio::test]
async fn assistant_chunks_concatenate() {
    let invocation = replay(
        &[ASSISTANT_A, ASSISTANT_B, r#"{"type":"result","is_error":false}"#],
        0,
    );
    let done = assert_ok!(bridge().complete(&invocation).await);

    assert_eq!(done.message, "AB");
    assert!(done.session_id.is_none());
}

#[tokio::test]
async fn result_text_only() {
    let invocation = replay(
        &[r#"{"type":"result","is_error":false,"result":"hello","session_id":"sess-1"}"#],
        0,
    );
    let done = assert_ok!(bridge().complete(&invocation).await);

    assert_eq!(done.message, "hello");
    assert_eq!(done.session_id.as_deref(), Some("sess-1"));
}

#[tokio::test]
async fn error_result_with_failing_exit() {
    let invocation = replay(&[r#"{"type":"result","is_error":true,"result":"bad thing"}"#], 1);
    let err = assert_err!(bridge().complete(&invocation).await);

    assert_eq!(err.to_string(), "CLI error: bad thing");
}

#[tokio::test]
async fn no_parseable_lines_is_empty_result() {
    let invocation = replay(&["not json", "{broken", ""], 0);
    let err = assert_err!(bridge().complete(&invocation).await);

    assert!(matches!(err, BridgeError::EmptyResult));
}

#[tokio::test]
async fn malformed_lines_do_not_abort_stream() {
    let invocation = replay(
        &[ASSISTANT_A, "garbage {", r#"{"type":"system","subtype":"init"}"#, ASSISTANT_B],
        0,
    );
    let done = assert_ok!(bridge().complete(&invocation).await);

    assert_eq!(done.message, "AB");
}

#[tokio::test]
async fn stderr_reported_on_failure() {
    let invocation = sh("cat >/dev/null; echo 'auth expired' >&2; exit 3", &[]);
    let outcome = assert_ok!(bridge().run(&invocation).await);

    assert_eq!(outcome.exit(), Some(ProcessExit::Code(3)));
    let err = assert_err!(outcome.finalize());
    assert_eq!(err.to_string(), "CLI error: auth expired");
}

#[tokio::test]
async fn stdin_receives_one_turn_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let capture = dir.path().join("stdin.jsonl");
    let mut invocation = sh(
        r#"cat > "$1"; printf '%s\n' '{"type":"result","is_error":false,"result":"ok"}'"#,
        &[capture.to_str().unwrap()],
    );
    invocation.messages = vec![OutboundMessage::user("first"), OutboundMessage::user("second")];

    assert_ok!(bridge().complete(&invocation).await);

    let written = std::fs::read_to_string(&capture).unwrap();
    assert_eq!(
        written,
        concat!(
            r#"{"type":"user","message":{"role":"user","content":"first"}}"#,
            "\n",
            r#"{"type":"user","message":{"role":"user","content":"second"}}"#,
            "\n",
        )
    );
}

#[tokio::test]
async fn env_policy_and_working_dir_are_applied() {
    std::env::set_var("CLAUDE_BRIDGE_TEST_SECRET", "leak");
    let dir = tempfile::tempdir().unwrap();
    let cwd = dir.path().canonicalize().unwrap();
    let mut invocation = sh(
        r#"cat >/dev/null; printf '{"type":"result","is_error":false,"result":"%s|%s|%s"}\n' "$CLAUDE_CODE_ENTRYPOINT" "${CLAUDE_BRIDGE_TEST_SECRET:-unset}" "$(pwd -P)""#,
        &[],
    );
    invocation.working_dir = cwd.clone();
    invocation.env = EnvPolicy {
        set: vec![("CLAUDE_CODE_ENTRYPOINT".to_string(), "sdk-rust".to_string())],
        remove: vec!["CLAUDE_BRIDGE_TEST_SECRET".to_string()],
    };

    let done = assert_ok!(bridge().complete(&invocation).await);

    assert_eq!(done.message, format!("sdk-rust|unset|{}", cwd.display()));
}

#[tokio::test]
async fn exit_timeout_kills_and_keeps_output() {
    let invocation = sh(
        &format!("cat >/dev/null; printf '%s\\n' '{ASSISTANT_A}'; exec >&-; exec sleep 30"),
        &[],
    );
    let started = Instant::now();
    let outcome = assert_ok!(
        bridge()
            .with_exit_timeout(Duration::from_millis(300))
            .run(&invocation)
            .await
    );

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(outcome.exit(), Some(ProcessExit::TimedOut));
    let done = assert_ok!(outcome.finalize());
    assert_eq!(done.message, "A");
}

#[tokio::test]
async fn stdin_write_failure_kills_process() {
    let mut invocation = sh("exec 0<&-; sleep 30", &[]);
    invocation.messages = vec![OutboundMessage::user("x".repeat(1024 * 1024))];
    let started = Instant::now();

    let err = assert_err!(bridge().run(&invocation).await);

    assert!(matches!(err, BridgeError::Write(_)));
    assert!(err.to_string().starts_with("Failed to write stdin: "));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn invalid_utf8_line_is_skipped() {
    let invocation = sh(
        &format!("cat >/dev/null; printf '\\377\\376\\n'; printf '%s\\n' '{ASSISTANT_B}'"),
        &[],
    );
    let done = assert_ok!(bridge().complete(&invocation).await);

    assert_eq!(done.message, "B");
}

#[tokio::test]
async fn missing_executable_is_spawn_error() {
    let err = assert_err!(
        Bridge::new(PathBuf::from("/nonexistent/claude"))
            .run(&replay(&[], 0))
            .await
    );

    assert!(matches!(err, BridgeError::Spawn(_)));
    assert!(err.to_string().starts_with("Failed to start Claude CLI"));
}
