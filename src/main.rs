//! Claude Bridge - run the Claude Code CLI for one structured request.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use claude_bridge::bridge::BridgeError;
use claude_bridge::commands::Invoker;
use claude_bridge::config::ConfigLoader;
use claude_bridge::request::EntryPoint;
use claude_bridge::response::Response;

#[derive(Parser)]
#[command(
    name = "claude-bridge",
    about = "Run the Claude Code CLI for one request read as JSON from stdin",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv). Logs go to stderr.
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (default: ./.claude-bridge.toml, then the user config dir).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an encouragement message.
    Cheer,
    /// Search terminal history (`mode`: search or deepsearch).
    Search,
}

impl From<&Commands> for EntryPoint {
    fn from(command: &Commands) -> Self {
        match command {
            Commands::Cheer => EntryPoint::Cheer,
            Commands::Search => EntryPoint::Search,
        }
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn read_stdin() -> Result<String, BridgeError> {
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .map_err(|e| BridgeError::Input(e.to_string()))?;
    Ok(input)
}

async fn respond(cli: &Cli) -> Response {
    let loader = cli
        .config
        .clone()
        .map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    let config = match loader.load() {
        Ok(config) => config,
        Err(e) => return Response::error(&BridgeError::from(e)),
    };

    let input = match read_stdin().await {
        Ok(input) => input,
        Err(e) => return Response::error(&e),
    };

    Invoker::from_env(config)
        .respond(EntryPoint::from(&cli.command), &input)
        .await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let response = respond(&cli).await;
    println!("{}", response.to_line());

    if response.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
