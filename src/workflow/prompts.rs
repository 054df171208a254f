//! Interactive prompts for walking the queue.
//!
//! Terminal rendering only; every state change goes through the engine.
//! Prompts go to stderr so stdout carries nothing but the command result.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::session::{RequestState, SessionProgress};

/// What the user chose for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    /// Open the profile.
    Open,
    /// Mark the request completed.
    Complete,
    /// Skip the request.
    Skip,
    /// Save and stop for now.
    Stop,
}

impl WalkAction {
    /// Map a key press to an action.
    #[must_use]
    pub fn from_key(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'o' => Some(Self::Open),
            'c' => Some(Self::Complete),
            's' => Some(Self::Skip),
            'p' | 'q' => Some(Self::Stop),
            _ => None,
        }
    }
}

/// Prompts for the interactive walk.
pub struct WalkPrompt;

impl WalkPrompt {
    /// Display a welcome message for a new walk.
    pub fn welcome(total: usize, guided: bool) {
        eprintln!();
        eprintln!("{}", "╔══════════════════════════════════════════════════════════════╗".cyan());
        eprintln!("{}", "║                Pending Follow Request Cleanup                ║".cyan());
        eprintln!("{}", "╚══════════════════════════════════════════════════════════════╝".cyan());
        eprintln!();
        eprintln!("{total} pending request(s) in the queue.");
        if guided {
            eprintln!("{}", "Guided mode: each profile opens as soon as it comes up.".dimmed());
        } else {
            eprintln!("{}", "Manual mode: press 'o' to open each profile.".dimmed());
        }
        eprintln!();
    }

    /// Display where a resumed session picks up.
    pub fn resume_message(progress: &SessionProgress) {
        eprintln!();
        eprintln!(
            "{} Resuming at request {} of {} ({}% done)",
            "↻".cyan(),
            (progress.position + 1).to_string().bold(),
            progress.total,
            progress.percent()
        );
    }

    /// Display the header for the current request.
    pub fn request_header(request: &RequestState, progress: &SessionProgress) {
        eprintln!();
        eprintln!(
            "{} Request {}/{}",
            Self::progress_bar(progress.percent()),
            progress.position + 1,
            progress.total
        );
        eprintln!("{}", "─".repeat(60).dimmed());
        eprintln!("  {} @{}", "Username:".bold(), request.username);
        if request.is_opened() {
            eprintln!("  {}", "Profile opened. Complete or skip it.".green());
        } else {
            eprintln!("  {}", "Open the profile to continue.".yellow());
        }
        eprintln!();
    }

    /// Generate a progress bar string.
    fn progress_bar(percent: u8) -> String {
        let filled = (usize::from(percent) / 5).min(20);
        let empty = 20 - filled;
        format!(
            "[{}{}] {}%",
            "█".repeat(filled).green(),
            "░".repeat(empty).dimmed(),
            percent
        )
    }

    /// Show the available options.
    pub fn show_options(opened: bool) {
        let mut options = vec![("o", "Open profile")];
        if opened {
            options.push(("c", "Mark completed"));
            options.push(("s", "Skip"));
        }
        options.push(("p", "Stop for now (progress is saved)"));

        for (key, label) in options {
            eprintln!("  {} {}", format!("[{key}]").cyan(), label);
        }
        eprint!("\n  > ");
        io::stderr().flush().ok();
    }

    /// Read the user's choice. End of input counts as stop.
    pub fn read_action() -> WalkAction {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        loop {
            let mut line = String::new();
            match input.read_line(&mut line) {
                Ok(0) | Err(_) => return WalkAction::Stop,
                Ok(_) => {},
            }
            if let Some(action) = line.trim().chars().next().and_then(WalkAction::from_key) {
                return action;
            }
            eprint!("  {} > ", "Invalid option, try again.".yellow());
            io::stderr().flush().ok();
        }
    }

    /// Show the URL that was opened.
    pub fn opened(url: &str) {
        eprintln!("  {} {}", "→".green(), url.underline());
    }

    /// Show why the engine declined.
    pub fn refused(reason: &str) {
        eprintln!("  {} {}", "⚠".yellow(), reason.yellow());
    }

    /// Display the message shown when stopping early.
    pub fn stopped(session_path: &str) {
        eprintln!();
        eprintln!(
            "  {} Progress saved to {}. Run 'followsweep walk' to resume.",
            "💾".cyan(),
            session_path
        );
    }

    /// Display the final summary.
    pub fn all_done(progress: &SessionProgress) {
        eprintln!();
        eprintln!("{}", "╔══════════════════════════════════════════════════════════════╗".green());
        eprintln!("{}", "║             All pending follow requests processed            ║".green());
        eprintln!("{}", "╚══════════════════════════════════════════════════════════════╝".green());
        eprintln!();
        eprintln!("    {} {} completed", progress.completed, "✓".green());
        eprintln!("    {} skipped", progress.skipped);
        eprintln!();
    }
}
