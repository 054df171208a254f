//! Command-line interface: argument model and command implementations.

pub mod args;
pub mod commands;
