//! Claude Code process spawning and control.
//!
//! This module provides a builder for the stream-json command line and a
//! handle over the running process with piped stdin, stdout and stderr.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};

use super::OutboundMessage;

/// Error type for process spawning operations.
#[derive(thiserror::Error, Debug)]
pub enum SpawnError {
    /// The binary was not found.
    #[error("Claude binary not found")]
    NotFound,
    /// Permission denied when spawning.
    #[error("Permission denied")]
    PermissionDenied,
    /// Other I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpawnError {
    /// Create a `SpawnError` from an I/O error, classifying common cases.
    fn from_io(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound,
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Io(err),
        }
    }
}

/// Builder for the Claude Code stream-json argument vector.
#[derive(Debug, Clone, Default)]
pub struct ClaudeProcessBuilder {
    model: String,
    disallowed_tools: Option<String>,
    add_dirs: Vec<PathBuf>,
    resume_session: Option<String>,
}

impl ClaudeProcessBuilder {
    /// Create a new builder for the given model.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Disallow tools matching the pattern (`*` disables all of them).
    #[must_use]
    pub fn disallowed_tools(mut self, pattern: impl Into<String>) -> Self {
        self.disallowed_tools = Some(pattern.into());
        self
    }

    /// Grant tool access to an additional directory.
    #[must_use]
    pub fn add_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.add_dirs.push(dir.into());
        self
    }

    /// Resume an existing session.
    #[must_use]
    pub fn resume(mut self, session_id: impl Into<String>) -> Self {
        self.resume_session = Some(session_id.into());
        self
    }

    /// Get the model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the command-line arguments.
    #[must_use]
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            "--output-format".to_string(),
            "stream-json".to_string(),
            "--input-format".to_string(),
            "stream-json".to_string(),
            "--model".to_string(),
            self.model.clone(),
            "--verbose".to_string(),
            "--print".to_string(),
            String::new(),
        ];

        if !self.add_dirs.is_empty() {
            args.push("--add-dir".to_string());
            args.extend(self.add_dirs.iter().map(|d| d.to_string_lossy().into_owned()));
        }

        if let Some(pattern) = &self.disallowed_tools {
            args.push("--disallowedTools".to_string());
            args.push(pattern.clone());
        }

        if let Some(session_id) = &self.resume_session {
            args.push("--resume".to_string());
            args.push(session_id.clone());
        }

        args
    }
}

/// Environment changes applied on top of the inherited environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvPolicy {
    /// Variables to set.
    pub set: Vec<(String, String)>,
    /// Variables to remove.
    pub remove: Vec<String>,
}

impl EnvPolicy {
    fn apply(&self, cmd: &mut Command) {
        for key in &self.remove {
            cmd.env_remove(key);
        }
        for (key, value) in &self.set {
            cmd.env(key, value);
        }
    }
}

/// A running Claude Code process.
///
/// The child is killed if the handle is dropped before it exits.
#[derive(Debug)]
pub struct ClaudeProcess {
    child: Child,
}

impl ClaudeProcess {
    /// Spawn `program` with piped stdio.
    ///
    /// # Errors
    ///
    /// Returns `SpawnError` if the process fails to spawn.
    pub fn spawn<I, S>(
        program: &Path,
        args: I,
        working_dir: &Path,
        env: &EnvPolicy,
    ) -> Result<Self, SpawnError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        env.apply(&mut cmd);

        #[cfg(windows)]
        {
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }

        let child = cmd.spawn().map_err(SpawnError::from_io)?;

        Ok(Self { child })
    }

    /// Take ownership of the stdin handle.
    ///
    /// This can only be called once; subsequent calls return `None`.
    pub fn take_stdin(&mut self) -> Option<ChildStdin> {
        self.child.stdin.take()
    }

    /// Take ownership of the stdout handle.
    ///
    /// This can only be called once; subsequent calls return `None`.
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child.stdout.take()
    }

    /// Take ownership of the stderr handle.
    ///
    /// This can only be called once; subsequent calls return `None`.
    pub fn take_stderr(&mut self) -> Option<ChildStderr> {
        self.child.stderr.take()
    }

    /// Get the process ID, if still running.
    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Wait for the process to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if waiting fails.
    pub async fn wait(&mut self) -> std::io::Result<ExitStatus> {
        self.child.wait().await
    }

    /// Forcefully kill the process.
    ///
    /// # Errors
    ///
    /// Returns an error if the kill signal cannot be sent.
    pub async fn kill(&mut self) -> std::io::Result<()> {
        self.child.kill().await
    }
}

/// Write each message as one stream-json line, then close stdin.
///
/// # Errors
///
/// Returns the first write or flush error.
pub async fn write_messages(
    mut stdin: ChildStdin,
    messages: &[OutboundMessage],
) -> std::io::Result<()> {
    for message in messages {
        let mut line = serde_json::to_vec(&message.to_turn())?;
        line.push(b'\n');
        stdin.write_all(&line).await?;
    }
    stdin.flush().await?;
    stdin.shutdown().await?;
    Ok(())
}
