//! Import and reset commands.

use std::path::Path;

use chrono::Utc;
use colored::Colorize;
use log::info;
use serde_json::json;

use super::Context;
use crate::cli::args::OutputFormat;
use crate::error::SweepError;
use crate::import::parse_export_file;
use crate::output::to_json;
use crate::session::initialize_session;
use crate::workflow::profile_url;

/// Import an export file and start a new session.
///
/// An unfinished session is only replaced with `force`.
///
/// # Errors
///
/// Returns an error if the export cannot be parsed, an unfinished session
/// exists without `force`, or the session cannot be saved.
pub fn import(ctx: &Context, file: &Path, force: bool) -> Result<String, SweepError> {
    if !force {
        if let Some(existing) = ctx.store.load_if_exists()? {
            let progress = existing.progress();
            if !progress.is_complete() {
                return Err(SweepError::NotAllowed(format!(
                    "An unfinished session exists ({} of {} done). \
                     Use --force to replace it or 'followsweep reset' to discard it.",
                    progress.position, progress.total
                )));
            }
        }
    }

    let pending = parse_export_file(file)?;
    let imported = pending.len();
    let session_id = uuid::Uuid::new_v4().to_string();
    let session = initialize_session(pending, session_id, Utc::now());
    ctx.store.save(&session)?;

    info!(
        "Imported {} request(s) from {} into session {}",
        session.len(),
        file.display(),
        session.session_id
    );

    match ctx.format {
        OutputFormat::Json => to_json(&json!({
            "session_id": session.session_id,
            "records": imported,
            "queued": session.len(),
            "session_file": ctx.store.path().display().to_string(),
            "first": session.current_request().map(|r| r.username.clone()),
        })),
        OutputFormat::Pretty => {
            let mut output = vec![format!(
                "{} Imported {} pending request(s).",
                "✓".green(),
                session.len().to_string().bold()
            )];
            if imported > session.len() {
                output.push(format!(
                    "  {} duplicate request(s) merged.",
                    imported - session.len()
                ));
            }
            if let Some(first) = session.current_request() {
                output.push(format!(
                    "  First up: @{} {}",
                    first.username,
                    profile_url(&first.username).dimmed()
                ));
                output.push(String::new());
                output.push("  Use 'followsweep walk' to start".dimmed().to_string());
            }
            Ok(output.join("\n"))
        },
    }
}

/// Discard the saved session.
///
/// # Errors
///
/// Returns an error if the session file exists but cannot be deleted.
pub fn reset(ctx: &Context) -> Result<String, SweepError> {
    let removed = ctx.store.delete()?;
    if removed {
        info!("Reset session at {}", ctx.store.path().display());
    }

    match ctx.format {
        OutputFormat::Json => to_json(&json!({ "reset": removed })),
        OutputFormat::Pretty => Ok(if removed {
            "Session discarded.".to_string()
        } else {
            "No saved session.".to_string()
        }),
    }
}
