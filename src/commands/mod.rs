//! Host-facing commands.

mod invoke;

pub use invoke::*;
