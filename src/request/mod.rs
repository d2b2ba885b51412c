//! Request construction for the two host entry points.
//!
//! # Components
//!
//! - [`HostInput`] / [`Request`]: what the host asked for
//! - [`RequestBuilder`]: argument vector, user turns and environment policy
//! - [`Clock`]: injected wall clock for the cheer prompt

mod builder;
mod clock;
pub mod prompts;
mod types;

pub use builder::*;
pub use clock::*;
pub use types::*;
