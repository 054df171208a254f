//! Interactive walk through the queue.
//!
//! This is the `followsweep walk` command: one request at a time, with the
//! session saved after every change so stopping is always safe.

use log::debug;

use super::Context;
use crate::cli::args::{OutputFormat, WorkflowMode};
use crate::error::SweepError;
use crate::output::format_status;
use crate::session::{RequestState, SessionState};
use crate::workflow::{Engine, ProfileOpener, Transition, WalkAction, WalkPrompt};

/// Execute the walk command.
///
/// # Errors
///
/// Returns an error if there is no session or it cannot be loaded or saved.
pub fn walk(
    ctx: &Context,
    mode: Option<WorkflowMode>,
    no_browser: bool,
) -> Result<String, SweepError> {
    let mut session = ctx.load_session()?;
    let engine = ctx.engine();
    let opener = ctx.opener(no_browser);
    let guided = mode.unwrap_or(ctx.config.workflow.mode) == WorkflowMode::Guided;

    debug!(
        "Walking session {} from index {} (guided: {guided})",
        session.session_id,
        session.current_index()
    );

    if engine.has_more(&session) {
        let fresh = session.current_index() == 0
            && !engine.current(&session).is_some_and(RequestState::is_opened);
        if fresh {
            WalkPrompt::welcome(session.len(), guided);
        } else {
            WalkPrompt::resume_message(&session.progress());
        }
    }

    let finished = run_walk_loop(ctx, &engine, opener.as_ref(), &mut session, guided)?;

    if finished {
        match ctx.format {
            OutputFormat::Json => return format_status(&session, ctx.format),
            OutputFormat::Pretty => WalkPrompt::all_done(&session.progress()),
        }
    } else {
        WalkPrompt::stopped(&ctx.store.path().display().to_string());
    }

    Ok(String::new())
}

/// Run until the queue is exhausted (`true`) or the user stops (`false`).
fn run_walk_loop(
    ctx: &Context,
    engine: &Engine,
    opener: &dyn ProfileOpener,
    session: &mut SessionState,
    guided: bool,
) -> Result<bool, SweepError> {
    loop {
        let Some(request) = engine.current(session) else {
            return Ok(true);
        };

        if guided && !request.is_opened() {
            open_and_save(ctx, engine, opener, session)?;
        }

        let Some(request) = engine.current(session) else {
            return Ok(true);
        };
        WalkPrompt::request_header(request, &session.progress());
        WalkPrompt::show_options(request.is_opened());

        match WalkPrompt::read_action() {
            WalkAction::Open => open_and_save(ctx, engine, opener, session)?,
            WalkAction::Complete => {
                let outcome = engine.mark_completed(session);
                apply(ctx, session, outcome)?;
            },
            WalkAction::Skip => {
                let outcome = engine.mark_skipped(session);
                apply(ctx, session, outcome)?;
            },
            WalkAction::Stop => {
                ctx.store.save(session)?;
                return Ok(false);
            },
        }
    }
}

fn open_and_save(
    ctx: &Context,
    engine: &Engine,
    opener: &dyn ProfileOpener,
    session: &mut SessionState,
) -> Result<(), SweepError> {
    match engine.open_current(session, opener) {
        Ok(url) => {
            ctx.store.save(session)?;
            WalkPrompt::opened(&url);
        },
        Err(refusal) => WalkPrompt::refused(&refusal.to_string()),
    }
    Ok(())
}

fn apply(ctx: &Context, session: &SessionState, outcome: Transition) -> Result<(), SweepError> {
    match outcome {
        Ok(()) => ctx.store.save(session),
        Err(refusal) => {
            WalkPrompt::refused(&refusal.to_string());
            Ok(())
        },
    }
}
