//! Output formatting for followsweep.
//!
//! This module renders session views in pretty or JSON form.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::SweepError;
use crate::session::{RequestState, SessionState};

pub use json::*;
pub use pretty::*;

/// Format session progress based on output format
///
/// # Errors
///
/// Returns `SweepError::Parse` if JSON serialization fails.
pub fn format_status(session: &SessionState, format: OutputFormat) -> Result<String, SweepError> {
    match format {
        OutputFormat::Pretty => Ok(format_status_pretty(session)),
        OutputFormat::Json => format_status_json(session),
    }
}

/// Format the queue based on output format
///
/// # Errors
///
/// Returns `SweepError::Parse` if JSON serialization fails.
pub fn format_queue(session: &SessionState, format: OutputFormat) -> Result<String, SweepError> {
    match format {
        OutputFormat::Pretty => Ok(format_queue_pretty(session)),
        OutputFormat::Json => format_queue_json(session),
    }
}

/// Format the current request based on output format
///
/// # Errors
///
/// Returns `SweepError::Parse` if JSON serialization fails.
pub fn format_current(
    request: Option<&RequestState>,
    format: OutputFormat,
) -> Result<String, SweepError> {
    match format {
        OutputFormat::Pretty => Ok(format_current_pretty(request)),
        OutputFormat::Json => format_current_json(request),
    }
}
