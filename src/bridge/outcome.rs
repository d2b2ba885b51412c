//! Accumulated state of one CLI run and its reduction to a result.

use std::process::ExitStatus;

use crate::cli::{BridgeEvent, Terminal};

use super::BridgeError;

/// How the process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    /// Normal exit with a status code.
    Code(i32),
    /// Terminated by a signal we did not send.
    Signal,
    /// Still running after the exit wait; killed by the bridge.
    TimedOut,
}

impl From<ExitStatus> for ProcessExit {
    fn from(status: ExitStatus) -> Self {
        status.code().map_or(Self::Signal, Self::Code)
    }
}

/// A successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Assistant text, trimmed.
    pub message: String,
    pub session_id: Option<String>,
}

/// Everything observed during one run.
///
/// Text only grows and each terminal field is set at most once.
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    text: String,
    terminal: Option<Terminal>,
    error_text: Option<String>,
    session_id: Option<String>,
    exit: Option<ProcessExit>,
    stderr: String,
}

impl Outcome {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one stream event into the outcome.
    ///
    /// Assistant text wins over a result event's text; a result only fills
    /// the message when nothing has accumulated yet.
    pub fn apply(&mut self, event: BridgeEvent) {
        match event {
            BridgeEvent::TextChunk(chunk) => self.text.push_str(&chunk),
            BridgeEvent::Terminal(terminal) => self.apply_terminal(terminal),
            BridgeEvent::Unrecognized => {}
        }
    }

    fn apply_terminal(&mut self, terminal: Terminal) {
        if self.terminal.is_some() {
            tracing::debug!("Additional result event received");
        }

        let text = terminal.result_text.clone().filter(|t| !t.is_empty());
        if terminal.is_error {
            if self.error_text.is_none() {
                self.error_text = text;
            }
        } else {
            if self.text.is_empty() {
                if let Some(text) = text {
                    self.text = text;
                }
            }
            if self.session_id.is_none() {
                self.session_id.clone_from(&terminal.session_id);
            }
        }

        if self.terminal.is_none() {
            self.terminal = Some(terminal);
        }
    }

    /// Accumulated assistant text, untrimmed.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The first terminal event, if any arrived.
    #[must_use]
    pub fn terminal(&self) -> Option<&Terminal> {
        self.terminal.as_ref()
    }

    #[must_use]
    pub fn exit(&self) -> Option<ProcessExit> {
        self.exit
    }

    pub fn set_exit(&mut self, exit: ProcessExit) {
        self.exit = Some(exit);
    }

    /// Captured stderr; only consulted on failure.
    pub fn set_stderr(&mut self, stderr: String) {
        self.stderr = stderr;
    }

    /// Reduce to the final result.
    ///
    /// # Errors
    ///
    /// - `BridgeError::Process` on a non-zero exit or signal, carrying the
    ///   terminal error text, else stderr, else a placeholder; also on a clean
    ///   exit with no text but a terminal error, and on a timed-out exit with
    ///   any terminal error.
    /// - `BridgeError::EmptyResult` when a clean exit produced nothing.
    pub fn finalize(self) -> Result<Completion, BridgeError> {
        let failure = match self.exit {
            Some(ProcessExit::Code(0) | ProcessExit::TimedOut) | None => None,
            Some(ProcessExit::Code(code)) => Some(format!("exit status {code}")),
            Some(ProcessExit::Signal) => Some("terminated by signal".to_string()),
        };

        if let Some(placeholder) = failure {
            let stderr = self.stderr.trim();
            let message = self
                .error_text
                .or_else(|| (!stderr.is_empty()).then(|| stderr.to_string()))
                .unwrap_or(placeholder);
            return Err(BridgeError::Process(message));
        }

        if self.exit == Some(ProcessExit::TimedOut) {
            if let Some(error) = self.error_text {
                return Err(BridgeError::Process(error));
            }
        }

        let message = self.text.trim();
        if !message.is_empty() {
            return Ok(Completion {
                message: message.to_string(),
                session_id: self.session_id,
            });
        }

        match self.error_text {
            Some(error) => Err(BridgeError::Process(error)),
            None => Err(BridgeError::EmptyResult),
        }
    }
}
