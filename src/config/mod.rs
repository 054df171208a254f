//! Configuration management for followsweep.
//!
//! This module handles loading configuration from `~/.followsweep/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{Config, GeneralConfig, StorageConfig, WorkflowConfig};
