//! The process bridge: one Claude Code subprocess per request.
//!
//! # Components
//!
//! - [`Bridge`]: spawns the CLI, sends the conversation, reads the event
//!   stream and waits for exit
//! - [`Outcome`]: what was observed, reduced by [`Outcome::finalize`]
//! - [`BridgeError`]: every way an invocation can fail

mod error;
mod outcome;
mod runner;

pub use error::*;
pub use outcome::*;
pub use runner::*;
