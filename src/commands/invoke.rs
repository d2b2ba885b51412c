//! One host invocation: parse input, locate the CLI, build, run, respond.

use crate::bridge::{Bridge, BridgeError};
use crate::cli::ToolLocator;
use crate::config::BridgeConfig;
use crate::request::{
    Clock, EntryPoint, EnvSnapshot, HostInput, Request, RequestBuilder, SystemClock,
};
use crate::response::Response;

/// Runs host requests with a fixed configuration.
#[derive(Debug)]
pub struct Invoker<C> {
    config: BridgeConfig,
    env: EnvSnapshot,
    clock: C,
    locator: ToolLocator,
}

impl Invoker<SystemClock> {
    /// An invoker using the process environment, system clock and the
    /// default CLI search locations plus any configured extras.
    #[must_use]
    pub fn from_env(config: BridgeConfig) -> Self {
        let locator =
            ToolLocator::from_env().with_extra_fallbacks(config.cli.extra_fallbacks.clone());
        Self::new(config, EnvSnapshot::capture(), SystemClock, locator)
    }
}

impl<C: Clock> Invoker<C> {
    #[must_use]
    pub fn new(config: BridgeConfig, env: EnvSnapshot, clock: C, locator: ToolLocator) -> Self {
        Self {
            config,
            env,
            clock,
            locator,
        }
    }

    /// Handle raw host input and always produce a response.
    pub async fn respond(&self, entry: EntryPoint, raw_input: &str) -> Response {
        let result = self.run(entry, raw_input).await;
        if let Err(err) = &result {
            tracing::error!(kind = err.kind(), error = %err, "Invocation failed");
        }
        result.into()
    }

    /// Handle raw host input.
    ///
    /// # Errors
    ///
    /// Returns the first error of the invocation; nothing is retried.
    pub async fn run(&self, entry: EntryPoint, raw_input: &str) -> Result<Response, BridgeError> {
        let request = Request::from_input(entry, HostInput::parse(raw_input)?);

        let program = match &self.config.cli.path {
            Some(path) => path.clone(),
            None => self.locator.locate()?,
        };

        let invocation = RequestBuilder::new(&self.config, &self.env, &self.clock).build(&request);
        let completion = Bridge::new(program)
            .with_exit_timeout(self.config.cli.exit_timeout())
            .complete(&invocation)
            .await?;

        tracing::info!(
            mode = ?request.mode,
            structured = request.mode.is_structured(),
            chars = completion.message.chars().count(),
            session = completion.session_id.is_some(),
            "Claude CLI responded"
        );
        Response::from_completion(request.mode, completion, &request.records)
    }
}
