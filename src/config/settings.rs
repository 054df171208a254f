//! Configuration settings for followsweep.
//!
//! Settings are loaded from `~/.followsweep/config.yaml`. Every field has a
//! default, so partial files are fine.

use std::path::PathBuf;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, WorkflowMode};
use crate::config::Paths;
use crate::error::SweepError;
use crate::workflow::DEFAULT_COOLDOWN_SECS;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Workflow settings.
    pub workflow: WorkflowConfig,
    /// Storage settings.
    pub storage: StorageConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
}

/// Workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Seconds before the same profile may be opened again.
    #[serde(default = "default_cooldown_seconds")]
    pub cooldown_seconds: u32,
    /// Default mode for `walk`.
    #[serde(default)]
    pub mode: WorkflowMode,
    /// Launch the system browser when a profile is opened.
    #[serde(default = "default_true")]
    pub launch_browser: bool,
}

/// Storage settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Override for the session file location.
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn default_cooldown_seconds() -> u32 {
    DEFAULT_COOLDOWN_SECS as u32
}

const fn default_true() -> bool {
    true
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            cooldown_seconds: default_cooldown_seconds(),
            mode: WorkflowMode::default(),
            launch_browser: default_true(),
        }
    }
}

impl WorkflowConfig {
    /// The open cooldown as a duration.
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::seconds(i64::from(self.cooldown_seconds))
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, SweepError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, SweepError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            SweepError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            SweepError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), SweepError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| SweepError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            SweepError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Resolve the session file: explicit path, then config, then the default.
    #[must_use]
    pub fn session_path(&self, explicit: Option<PathBuf>, paths: &Paths) -> PathBuf {
        explicit
            .or_else(|| self.storage.session_file.clone())
            .unwrap_or_else(|| paths.session_file.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.general.default_output, OutputFormat::Pretty);
        assert_eq!(config.workflow.cooldown_seconds, 8);
        assert_eq!(config.workflow.cooldown(), Duration::seconds(8));
        assert_eq!(config.workflow.mode, WorkflowMode::Manual);
        assert!(config.workflow.launch_browser);
        assert!(config.storage.session_file.is_none());
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let config = Config::load_from_path(&config_path).unwrap();

        // Should return defaults when file doesn't exist
        assert_eq!(config.general.default_output, OutputFormat::Pretty);
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut config = Config::default();
        config.workflow.cooldown_seconds = 30;
        config.workflow.mode = WorkflowMode::Guided;

        config.save_to_path(&config_path).unwrap();

        let loaded = Config::load_from_path(&config_path).unwrap();

        assert_eq!(loaded.workflow.cooldown_seconds, 30);
        assert_eq!(loaded.workflow.mode, WorkflowMode::Guided);
    }

    #[test]
    fn test_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let partial_yaml = r"
workflow:
  mode: guided
";
        std::fs::write(&config_path, partial_yaml).unwrap();

        let config = Config::load_from_path(&config_path).unwrap();

        assert_eq!(config.workflow.mode, WorkflowMode::Guided);
        // Defaults should be used for missing fields
        assert_eq!(config.workflow.cooldown_seconds, 8);
        assert!(config.workflow.launch_browser);
        assert_eq!(config.general.default_output, OutputFormat::Pretty);
    }

    #[test]
    fn test_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "workflow: [not, a, map]").unwrap();

        assert!(matches!(
            Config::load_from_path(&config_path),
            Err(SweepError::Config(_))
        ));
    }

    #[test]
    fn test_session_path_precedence() {
        let paths = Paths::with_root(PathBuf::from("/data"));
        let mut config = Config::default();

        assert_eq!(config.session_path(None, &paths), PathBuf::from("/data/session.json"));

        config.storage.session_file = Some(PathBuf::from("/cfg/s.json"));
        assert_eq!(config.session_path(None, &paths), PathBuf::from("/cfg/s.json"));

        assert_eq!(
            config.session_path(Some(PathBuf::from("/cli/s.json")), &paths),
            PathBuf::from("/cli/s.json")
        );
    }
}
