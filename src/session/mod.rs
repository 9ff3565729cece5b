//! Analysis session persistence.
//!
//! A session collects input module paths over several CLI invocations,
//! then stores the graph generated from them so later queries and exports
//! can reuse it. Each session is one JSON file named `typedep-<id>.json`.
//! Without an explicit id, the CLI works on the most recently modified
//! session file.

mod state;
mod store;

pub use state::SessionState;
pub use store::{SessionError, SessionResult, SessionStore};
