//! Export file parser.
//!
//! The export is a JSON document shaped like:
//!
//! ```json
//! {
//!   "relationships_follow_requests_sent": [
//!     { "string_list_data": [
//!         { "value": "alice", "href": "https://www.instagram.com/alice", "timestamp": 1700000000 }
//!     ] }
//!   ]
//! }
//! ```
//!
//! A missing root key is fatal. Individual records that lack a username,
//! URL or timestamp are dropped without failing the import.

use std::path::Path;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::core::datetime::from_epoch_seconds;
use crate::error::SweepError;

/// Top-level key holding the list of sent follow requests.
pub const EXPORT_ROOT_KEY: &str = "relationships_follow_requests_sent";

const RECORDS_KEY: &str = "string_list_data";

/// A follow request read from an export, before it becomes session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    /// Account the request was sent to.
    pub username: String,
    /// Profile URL as recorded in the export.
    pub profile_url: String,
    /// When the request was sent.
    pub requested_at: DateTime<Utc>,
}

/// Parse an export file from disk.
///
/// # Errors
///
/// Returns `SweepError::NotFound` if the file does not exist, `SweepError::Io`
/// if it cannot be read, and the errors of [`parse_export_str`] otherwise.
pub fn parse_export_file(path: &Path) -> Result<Vec<PendingRequest>, SweepError> {
    if !path.exists() {
        return Err(SweepError::NotFound(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let contents = std::fs::read_to_string(path)?;
    debug!("Read export file {} ({} bytes)", path.display(), contents.len());
    parse_export_str(&contents)
}

/// Parse export JSON text.
///
/// # Errors
///
/// Returns `SweepError::Parse` if the text is not JSON, and
/// `SweepError::Format` if the root is not an object, the root key is
/// missing, or its value is not a list.
pub fn parse_export_str(contents: &str) -> Result<Vec<PendingRequest>, SweepError> {
    let root: Value = serde_json::from_str(contents)?;

    let entries = root
        .as_object()
        .ok_or_else(|| SweepError::Format("expected a JSON object at the top level".to_string()))?
        .get(EXPORT_ROOT_KEY)
        .ok_or_else(|| SweepError::Format(format!("missing '{EXPORT_ROOT_KEY}'")))?
        .as_array()
        .ok_or_else(|| SweepError::Format(format!("'{EXPORT_ROOT_KEY}' is not a list")))?;

    let mut requests = Vec::new();
    let mut dropped = 0usize;

    for entry in entries {
        let records = entry
            .as_object()
            .and_then(|e| e.get(RECORDS_KEY))
            .and_then(Value::as_array);

        let Some(records) = records else {
            continue;
        };

        for record in records {
            match record.as_object().and_then(parse_record) {
                Some(request) => requests.push(request),
                None => dropped += 1,
            }
        }
    }

    if dropped > 0 {
        warn!("Dropped {dropped} malformed record(s) from export");
    }
    debug!("Parsed {} pending request(s)", requests.len());

    Ok(requests)
}

/// Build a request from one record, or `None` if any field is missing or empty.
fn parse_record(record: &Map<String, Value>) -> Option<PendingRequest> {
    let username = non_empty_str(record.get("value"))?;
    let profile_url = non_empty_str(record.get("href"))?;
    let requested_at = record
        .get("timestamp")
        .and_then(Value::as_f64)
        .filter(|ts| *ts != 0.0)
        .and_then(from_epoch_seconds)?;

    Some(PendingRequest {
        username: username.to_string(),
        profile_url: profile_url.to_string(),
        requested_at,
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
