//! Turns a `Request` into everything needed to run the CLI once.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::cli::{ClaudeProcessBuilder, EnvPolicy, OutboundMessage};
use crate::config::{BridgeConfig, CHEER_MODEL_ENV, ENTRYPOINT_ENV, SEARCH_MODEL_ENV};

use super::{prompts, Clock, Mode, Request};

/// Read-only view of the host environment taken at startup.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
    temp_dir: PathBuf,
}

impl EnvSnapshot {
    /// Build a snapshot from explicit values.
    #[must_use]
    pub fn new(vars: HashMap<String, String>, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            vars,
            temp_dir: temp_dir.into(),
        }
    }

    /// Capture the current process environment. Non-UTF-8 entries are skipped.
    #[must_use]
    pub fn capture() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self::new(vars, std::env::temp_dir())
    }

    /// A non-empty variable value.
    #[must_use]
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// The process-wide temporary directory.
    #[must_use]
    pub fn temp_dir(&self) -> &PathBuf {
        &self.temp_dir
    }
}

/// Everything the bridge needs to run one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub args: Vec<String>,
    /// User turns, in conversation order.
    pub messages: Vec<OutboundMessage>,
    pub allow_filesystem_tools: bool,
    pub working_dir: PathBuf,
    pub env: EnvPolicy,
}

/// Builds an [`Invocation`] from a [`Request`].
///
/// Pure apart from one existence check on the deepsearch folder: time comes
/// from the clock and the environment from the snapshot.
#[derive(Debug)]
pub struct RequestBuilder<'a, C> {
    config: &'a BridgeConfig,
    env: &'a EnvSnapshot,
    clock: C,
}

impl<'a, C: Clock> RequestBuilder<'a, C> {
    #[must_use]
    pub fn new(config: &'a BridgeConfig, env: &'a EnvSnapshot, clock: C) -> Self {
        Self { config, env, clock }
    }

    /// Model for a mode: environment override, then config.
    #[must_use]
    pub fn model_for(&self, mode: Mode) -> String {
        let (env_key, configured) = match mode {
            Mode::Cheer => (CHEER_MODEL_ENV, &self.config.models.cheer),
            Mode::Search | Mode::Deepsearch => (SEARCH_MODEL_ENV, &self.config.models.search),
        };
        self.env
            .var(env_key)
            .map_or_else(|| configured.clone(), str::to_string)
    }

    /// Build the invocation for a request.
    #[must_use]
    pub fn build(&self, request: &Request) -> Invocation {
        let mut process = ClaudeProcessBuilder::new(self.model_for(request.mode));
        let mut working_dir = self.env.temp_dir().clone();

        let (prompt, allow_filesystem_tools) = match request.mode {
            Mode::Cheer => {
                let now = self.clock.now();
                let prompt = if request.session_id.is_some() {
                    prompts::cheer_continuation(request.language, now)
                } else {
                    prompts::cheer_first_turn(request.language, now)
                };
                (prompt, false)
            }
            Mode::Search => (prompts::search(&request.query, &request.records), false),
            Mode::Deepsearch => {
                let folder = request
                    .folder_path
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let prompt = if request.is_claude_source() {
                    let project_path = request.project_path.as_deref().unwrap_or_default();
                    prompts::claude_deep_search(&request.query, &folder, project_path)
                } else {
                    prompts::deep_search(&request.query, &folder)
                };
                (prompt, true)
            }
        };

        if allow_filesystem_tools {
            match request.folder_path.as_ref().filter(|p| p.exists()) {
                Some(folder) => {
                    process = process.add_dir(folder.clone());
                    working_dir.clone_from(folder);
                }
                None => {
                    tracing::warn!("Deepsearch folder missing, running without --add-dir");
                }
            }
        } else {
            process = process.disallowed_tools("*");
        }

        if let Some(session_id) = &request.session_id {
            process = process.resume(session_id.clone());
        }

        tracing::debug!(
            mode = ?request.mode,
            model = %process.model(),
            resume = request.session_id.is_some(),
            allow_filesystem_tools,
            "Built Claude invocation"
        );

        Invocation {
            args: process.build_args(),
            messages: vec![OutboundMessage::user(prompt)],
            allow_filesystem_tools,
            working_dir,
            env: self.env_policy(),
        }
    }

    fn env_policy(&self) -> EnvPolicy {
        EnvPolicy {
            set: vec![(ENTRYPOINT_ENV.to_string(), self.config.env.entrypoint.clone())],
            remove: self.config.env.remove.clone(),
        }
    }
}
