//! The request workflow.
//!
//! The engine owns every legal transition on a session; the opener and
//! prompts are the collaborators around it.

mod engine;
mod opener;
mod prompts;

pub use engine::{Engine, Refusal, Transition, DEFAULT_COOLDOWN_SECS};
pub use opener::{
    is_launchable, profile_url, BrowserOpener, NoopOpener, ProfileOpener, PROFILE_BASE_URL,
};
pub use prompts::{WalkAction, WalkPrompt};
