//! CLI module for locating, spawning and parsing the Claude Code process.

mod events;
mod locator;
mod process;
mod stream;

pub use events::*;
pub use locator::*;
pub use process::*;
pub use stream::*;
