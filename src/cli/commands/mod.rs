//! Command implementations for followsweep.
//!
//! Every command loads the session, changes it only through the engine,
//! and saves it straight after a successful change.

mod completions;
mod import;
mod progress;
mod walk;

pub use completions::completions;
pub use import::{import, reset};
pub use progress::{complete, current, open, queue, skip, status};
pub use walk::walk;

use crate::cli::args::OutputFormat;
use crate::config::Config;
use crate::error::SweepError;
use crate::session::{SessionState, SessionStore};
use crate::workflow::{BrowserOpener, Engine, NoopOpener, ProfileOpener};

/// Everything a command needs to run.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded configuration.
    pub config: Config,
    /// Where the session lives.
    pub store: SessionStore,
    /// Output format for results.
    pub format: OutputFormat,
}

impl Context {
    /// Create a context.
    #[must_use]
    pub const fn new(config: Config, store: SessionStore, format: OutputFormat) -> Self {
        Self {
            config,
            store,
            format,
        }
    }

    /// Engine configured with the cooldown from settings.
    #[must_use]
    pub fn engine(&self) -> Engine {
        Engine::new().with_cooldown(self.config.workflow.cooldown())
    }

    /// Opener to use, honoring `--no-browser` and `workflow.launch_browser`.
    #[must_use]
    pub fn opener(&self, no_browser: bool) -> Box<dyn ProfileOpener> {
        if no_browser || !self.config.workflow.launch_browser {
            Box::new(NoopOpener)
        } else {
            Box::new(BrowserOpener)
        }
    }

    /// Load the saved session.
    ///
    /// # Errors
    ///
    /// Returns `SweepError::NotFound` with a hint when there is no session,
    /// or the load error for a malformed file.
    pub fn load_session(&self) -> Result<SessionState, SweepError> {
        match self.store.load() {
            Err(SweepError::NotFound(_)) => Err(SweepError::NotFound(
                "No active session. Run 'followsweep import <file>' first.".to_string(),
            )),
            other => other,
        }
    }
}
