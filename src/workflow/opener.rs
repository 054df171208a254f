//! Opening profiles outside the terminal.
//!
//! Launching a browser is a side channel: the engine records the open
//! before calling the opener and never looks at whether the launch worked.

use std::process::{Command, Stdio};

use log::debug;

use crate::error::SweepError;

/// Base of every profile URL.
pub const PROFILE_BASE_URL: &str = "https://www.instagram.com";

/// Build the profile URL for a username. The username is used as-is.
#[must_use]
pub fn profile_url(username: &str) -> String {
    format!("{PROFILE_BASE_URL}/{username}")
}

/// Something that can show a profile URL to the user.
#[cfg_attr(test, mockall::automock)]
pub trait ProfileOpener {
    /// Show the URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL could not be handed off.
    fn open(&self, url: &str) -> Result<(), SweepError>;
}

/// Whether `url` is a profile URL that is safe to hand to a launcher.
///
/// Usernames come from an imported file, and some launchers pass their
/// argument through a shell, so only `[A-Za-z0-9._]` is accepted.
#[must_use]
pub fn is_launchable(url: &str) -> bool {
    url.strip_prefix(PROFILE_BASE_URL)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|username| {
            !username.is_empty()
                && username
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
        })
}

/// Opens URLs in the system's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserOpener;

impl BrowserOpener {
    fn command(url: &str) -> Command {
        #[cfg(target_os = "macos")]
        {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        }
        #[cfg(target_os = "windows")]
        {
            let mut cmd = Command::new("rundll32");
            cmd.args(["url.dll,FileProtocolHandler", url]);
            cmd
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

impl ProfileOpener for BrowserOpener {
    fn open(&self, url: &str) -> Result<(), SweepError> {
        if !is_launchable(url) {
            return Err(SweepError::NotAllowed(format!(
                "refusing to launch a browser for {url}"
            )));
        }

        debug!("Launching browser for {url}");
        launch(Self::command(url))
    }
}

/// Run a launcher to completion. Launchers hand off to the browser and
/// return straight away, so waiting here leaves no child behind.
fn launch(mut cmd: Command) -> Result<(), SweepError> {
    let status = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if !status.success() {
        return Err(SweepError::Io(std::io::Error::other(format!(
            "browser launcher exited with {status}"
        ))));
    }
    Ok(())
}

/// Opener that does nothing; the URL is printed by the caller instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOpener;

impl ProfileOpener for NoopOpener {
    fn open(&self, _url: &str) -> Result<(), SweepError> {
        Ok(())
    }
}
