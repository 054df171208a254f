//! Session inspection and single-step commands.

use colored::Colorize;
use serde_json::json;

use super::Context;
use crate::cli::args::OutputFormat;
use crate::core::datetime::to_rfc3339;
use crate::error::SweepError;
use crate::output::{format_current, format_queue, format_status, request_value, to_json};
use crate::session::{RequestStatus, SessionState};

/// Show session progress.
///
/// # Errors
///
/// Returns an error if a saved session exists but cannot be loaded.
pub fn status(ctx: &Context) -> Result<String, SweepError> {
    match ctx.store.load_if_exists()? {
        Some(session) => format_status(&session, ctx.format),
        None => match ctx.format {
            OutputFormat::Json => to_json(&json!({ "active_session": false })),
            OutputFormat::Pretty => {
                Ok("No active session. Run 'followsweep import <file>' to begin.".to_string())
            },
        },
    }
}

/// List the queue.
///
/// # Errors
///
/// Returns an error if there is no session or it cannot be loaded.
pub fn queue(ctx: &Context) -> Result<String, SweepError> {
    let session = ctx.load_session()?;
    format_queue(&session, ctx.format)
}

/// Show the current request.
///
/// # Errors
///
/// Returns an error if there is no session or it cannot be loaded.
pub fn current(ctx: &Context) -> Result<String, SweepError> {
    let session = ctx.load_session()?;
    format_current(ctx.engine().current(&session), ctx.format)
}

/// Open the current profile.
///
/// # Errors
///
/// Returns `SweepError::NotAllowed` if the engine refuses, or a load/save error.
pub fn open(ctx: &Context, no_browser: bool) -> Result<String, SweepError> {
    let mut session = ctx.load_session()?;
    let opener = ctx.opener(no_browser);

    let url = ctx.engine().open_current(&mut session, opener.as_ref())?;
    ctx.store.save(&session)?;

    let request = session
        .current_request()
        .ok_or_else(|| SweepError::InvalidSession("current request vanished".to_string()))?;

    match ctx.format {
        OutputFormat::Json => to_json(&json!({
            "action": "opened",
            "username": request.username,
            "profile_url": url,
            "last_opened_at": request.last_opened_at.map(|t| to_rfc3339(&t)),
        })),
        OutputFormat::Pretty => Ok(format!(
            "Opened @{}\n  {} {}\n\n  {}",
            request.username,
            "→".green(),
            url.underline(),
            "Then run 'followsweep complete' or 'followsweep skip'".dimmed()
        )),
    }
}

/// Mark the current request completed.
///
/// # Errors
///
/// Returns `SweepError::NotAllowed` if the engine refuses, or a load/save error.
pub fn complete(ctx: &Context) -> Result<String, SweepError> {
    resolve(ctx, RequestStatus::Completed)
}

/// Skip the current request.
///
/// # Errors
///
/// Returns `SweepError::NotAllowed` if the engine refuses, or a load/save error.
pub fn skip(ctx: &Context) -> Result<String, SweepError> {
    resolve(ctx, RequestStatus::Skipped)
}

fn resolve(ctx: &Context, status: RequestStatus) -> Result<String, SweepError> {
    let mut session = ctx.load_session()?;
    let engine = ctx.engine();
    let username = engine.current(&session).map(|r| r.username.clone());

    match status {
        RequestStatus::Completed => engine.mark_completed(&mut session)?,
        RequestStatus::Skipped => engine.mark_skipped(&mut session)?,
        RequestStatus::Pending => {
            return Err(SweepError::NotAllowed(
                "requests cannot be moved back to pending".to_string(),
            ))
        },
    }
    ctx.store.save(&session)?;

    let username = username.unwrap_or_default();
    match ctx.format {
        OutputFormat::Json => to_json(&json!({
            "action": status,
            "username": username,
            "remaining": session.progress().pending,
            "next": session.current_request().map(request_value),
        })),
        OutputFormat::Pretty => Ok(resolved_message(&session, &username, status)),
    }
}

fn resolved_message(session: &SessionState, username: &str, status: RequestStatus) -> String {
    let verb = match status {
        RequestStatus::Completed => "Completed".green(),
        _ => "Skipped".yellow(),
    };
    let mut output = format!("{verb} @{username}");
    match session.current_request() {
        Some(next) => {
            let progress = session.progress();
            output.push_str(&format!(
                "\n  Next up: @{} ({} left)",
                next.username.bold(),
                progress.pending
            ));
        },
        None => {
            output.push_str(&format!(
                "\n  {}",
                "All pending follow requests processed.".green()
            ));
        },
    }
    output
}
