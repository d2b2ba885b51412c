//! Drives one Claude Code process from spawn to exit.
//!
//! The run is strictly sequential: write every user turn and close stdin,
//! read stdout to end-of-stream, then wait for exit. Stderr is drained on a
//! separate task the whole time so the child never blocks on a full pipe.
//! The only bounded wait is the exit wait after stdout closes; when it
//! elapses the child is killed and the run finishes with whatever was read.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use tokio::io::AsyncReadExt;
use tokio::process::ChildStderr;

use crate::cli::{read_events, write_messages, ClaudeProcess, SpawnError};
use crate::request::Invocation;

use super::{BridgeError, Completion, Outcome, ProcessExit};

/// Default time allowed for the process to exit after stdout closes.
pub const DEFAULT_EXIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Lifecycle phase of a run, reported in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Spawning,
    Sending,
    Streaming,
    Draining,
    Finalizing,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Spawning => "spawning",
            Self::Sending => "sending",
            Self::Streaming => "streaming",
            Self::Draining => "draining",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Runs invocations against one CLI executable.
#[derive(Debug, Clone)]
pub struct Bridge {
    program: PathBuf,
    exit_timeout: Duration,
}

impl Bridge {
    /// Create a bridge for the given executable.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            exit_timeout: DEFAULT_EXIT_TIMEOUT,
        }
    }

    /// Set how long to wait for exit once stdout has closed.
    #[must_use]
    pub fn with_exit_timeout(mut self, timeout: Duration) -> Self {
        self.exit_timeout = timeout;
        self
    }

    /// The executable this bridge runs.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run the invocation and reduce the outcome to a result.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Bridge::run`] or [`Outcome::finalize`].
    pub async fn complete(&self, invocation: &Invocation) -> Result<Completion, BridgeError> {
        self.run(invocation).await?.finalize()
    }

    /// Run the invocation and return everything observed.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::Spawn` if the process cannot be started and
    /// `BridgeError::Write` if sending the conversation fails; the process is
    /// killed in both cases.
    pub async fn run(&self, invocation: &Invocation) -> Result<Outcome, BridgeError> {
        tracing::debug!(phase = %Phase::Spawning, program = %self.program.display(), "Starting Claude CLI");
        let mut process = ClaudeProcess::spawn(
            &self.program,
            &invocation.args,
            &invocation.working_dir,
            &invocation.env,
        )?;

        let stdin = process.take_stdin().ok_or_else(|| pipe_missing("stdin"))?;
        let stdout = process.take_stdout().ok_or_else(|| pipe_missing("stdout"))?;
        let stderr = process.take_stderr().ok_or_else(|| pipe_missing("stderr"))?;
        let mut stderr_task = tokio::spawn(collect_stderr(stderr));

        tracing::debug!(
            phase = %Phase::Sending,
            pid = ?process.id(),
            messages = invocation.messages.len(),
            "Sending conversation"
        );
        if let Err(e) = write_messages(stdin, &invocation.messages).await {
            tracing::warn!(error = %e, "Failed to write to Claude stdin, killing process");
            if let Err(kill_err) = process.kill().await {
                tracing::debug!(error = %kill_err, "Kill after write failure failed");
            }
            stderr_task.abort();
            return Err(BridgeError::Write(e));
        }

        tracing::debug!(phase = %Phase::Streaming, "Reading events");
        let mut outcome = Outcome::new();
        let events = read_events(stdout);
        futures_util::pin_mut!(events);
        let mut skipped = 0usize;
        while let Some(item) = events.next().await {
            match item {
                Ok(event) => outcome.apply(event.classify()),
                Err(e) if e.is_recoverable() => {
                    skipped += 1;
                    tracing::trace!(error = %e, "Skipping stdout line");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Stdout read failed, treating as end of stream");
                    break;
                }
            }
        }

        tracing::debug!(
            phase = %Phase::Draining,
            skipped,
            has_terminal = outcome.terminal().is_some(),
            "Stdout closed, waiting for exit"
        );
        let exit = match tokio::time::timeout(self.exit_timeout, process.wait()).await {
            Ok(Ok(status)) => ProcessExit::from(status),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Failed to wait for Claude CLI, killing it");
                self.force_kill(&mut process).await;
                ProcessExit::Signal
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = u64::try_from(self.exit_timeout.as_millis()).unwrap_or(u64::MAX),
                    "Claude CLI did not exit in time, killing it"
                );
                self.force_kill(&mut process).await;
                ProcessExit::TimedOut
            }
        };
        outcome.set_exit(exit);

        tracing::debug!(phase = %Phase::Finalizing, exit = ?exit, "Collecting stderr");
        let stderr_text = match tokio::time::timeout(self.exit_timeout, &mut stderr_task).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "Stderr collector failed");
                String::new()
            }
            Err(_) => {
                // A grandchild can keep the pipe open after the CLI is gone.
                stderr_task.abort();
                String::new()
            }
        };
        outcome.set_stderr(stderr_text);

        tracing::debug!(phase = %Phase::Done, "Claude CLI finished");
        Ok(outcome)
    }

    async fn force_kill(&self, process: &mut ClaudeProcess) {
        if let Err(e) = process.kill().await {
            tracing::debug!(error = %e, program = %self.program.display(), "Kill failed");
        }
    }
}

fn pipe_missing(name: &str) -> BridgeError {
    BridgeError::Spawn(SpawnError::Io(std::io::Error::other(format!(
        "{name} was not captured"
    ))))
}

async fn collect_stderr(mut stderr: ChildStderr) -> String {
    let mut buf = Vec::new();
    if let Err(e) = stderr.read_to_end(&mut buf).await {
        tracing::debug!(error = %e, "Stderr read failed");
    }
    String::from_utf8_lossy(&buf).into_owned()
}
