//! Path resolution for followsweep configuration and data files.
//!
//! All followsweep data is stored in `~/.followsweep/`:
//! - `config.yaml` - Main configuration file
//! - `session.json` - The saved session

use std::path::PathBuf;

use crate::error::SweepError;

/// Paths to followsweep configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.followsweep/`
    pub root: PathBuf,
    /// Config file: `~/.followsweep/config.yaml`
    pub config_file: PathBuf,
    /// Session file: `~/.followsweep/session.json`
    pub session_file: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, SweepError> {
        let home = std::env::var("HOME").map_err(|_| {
            SweepError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".followsweep")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            session_file: root.join("session.json"),
            root,
        }
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| {
            // Fallback to current directory if home cannot be determined
            Self::with_root(PathBuf::from(".followsweep"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_with_root() {
        let root = PathBuf::from("/tmp/test-followsweep");
        let paths = Paths::with_root(root.clone());

        assert_eq!(paths.root, root);
        assert_eq!(paths.config_file, root.join("config.yaml"));
        assert_eq!(paths.session_file, root.join("session.json"));
    }
}
