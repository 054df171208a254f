//! followsweep - pending follow request cleanup
//!
//! Imports the list of follow requests an account has sent and walks the
//! user through them one at a time. Each profile must be opened before it
//! can be marked completed or skipped, and progress is saved after every
//! step so a session can be stopped and resumed.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod import;
pub mod output;
pub mod session;
pub mod workflow;

pub use cli::args::{Cli, Commands, OutputFormat, WorkflowMode};
pub use error::SweepError;
pub use session::{SessionState, SessionStore};
pub use workflow::Engine;
