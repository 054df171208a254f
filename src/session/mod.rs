//! Session model and persistence.
//!
//! A session is created once per import, saved after every change, and
//! loaded back to resume. The workflow engine is the only thing that
//! mutates it after initialization.

mod state;
mod storage;

pub use state::{
    initialize_session, RequestState, RequestStatus, SessionProgress, SessionState,
};
pub use storage::SessionStore;
