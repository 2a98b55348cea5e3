//! Observable session state and the actions that change it.

mod session;
mod snapshot;
mod solve;
mod state;

pub use session::{SessionStore, MAX_MODULES_PER_REQUEST, MAX_MODULE_NUMBER, MIN_MODULE_NUMBER};
pub use snapshot::{Selection, SessionSnapshot};
pub use solve::SolveOutcome;
