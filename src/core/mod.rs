//! Core utilities shared by the import, session and workflow layers.

pub mod clock;
pub mod datetime;

pub use clock::{Clock, SystemClock};
