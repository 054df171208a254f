//! JSON output formatting for followsweep.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::core::datetime::to_rfc3339;
use crate::error::SweepError;
use crate::session::{RequestState, SessionState};
use crate::workflow::profile_url;

fn timestamp(dt: Option<DateTime<Utc>>) -> Value {
    dt.map_or(Value::Null, |dt| Value::String(to_rfc3339(&dt)))
}

/// JSON value for a single request.
#[must_use]
pub fn request_value(request: &RequestState) -> Value {
    json!({
        "username": request.username,
        "profile_url": profile_url(&request.username),
        "status": request.status,
        "last_opened_at": timestamp(request.last_opened_at),
        "completed_at": timestamp(request.completed_at),
    })
}

/// Format session progress as JSON.
///
/// # Errors
///
/// Returns `SweepError::Parse` if JSON serialization fails.
pub fn format_status_json(session: &SessionState) -> Result<String, SweepError> {
    let progress = session.progress();
    let output = json!({
        "active_session": true,
        "session_id": session.session_id,
        "created_at": to_rfc3339(&session.created_at),
        "last_updated_at": to_rfc3339(&session.last_updated_at),
        "total": progress.total,
        "completed": progress.completed,
        "skipped": progress.skipped,
        "pending": progress.pending,
        "current_index": progress.position,
        "progress_percent": progress.percent(),
        "finished": progress.is_complete(),
        "current": session.current_request().map(request_value),
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format the queue as JSON.
///
/// # Errors
///
/// Returns `SweepError::Parse` if JSON serialization fails.
pub fn format_queue_json(session: &SessionState) -> Result<String, SweepError> {
    let items: Vec<Value> = session
        .iter()
        .enumerate()
        .map(|(index, request)| {
            let mut value = request_value(request);
            value["index"] = json!(index);
            value["current"] = json!(index == session.current_index());
            value
        })
        .collect();

    let output = json!({
        "count": items.len(),
        "current_index": session.current_index(),
        "items": items,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format the current request as JSON (`null` once the queue is done).
///
/// # Errors
///
/// Returns `SweepError::Parse` if JSON serialization fails.
pub fn format_current_json(request: Option<&RequestState>) -> Result<String, SweepError> {
    let output = json!({ "current": request.map(request_value) });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Serialize any value as pretty JSON.
///
/// # Errors
///
/// Returns `SweepError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, SweepError> {
    Ok(serde_json::to_string_pretty(value)?)
}
