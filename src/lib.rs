//! Claude Bridge - run the Claude Code CLI for one structured request.
//!
//! The bridge spawns the CLI in stream-json mode, sends a single user turn,
//! folds the event stream into one outcome and hands the host a single JSON
//! line.

pub mod bridge;
pub mod cli;
pub mod commands;
pub mod config;
pub mod request;
pub mod response;
