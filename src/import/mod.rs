//! Import of follow-request export files.
//!
//! Turns the "pending follow requests" export into [`PendingRequest`]
//! values. Ordering is applied later, when a session is initialized.

mod parser;

pub use parser::{parse_export_file, parse_export_str, PendingRequest, EXPORT_ROOT_KEY};
