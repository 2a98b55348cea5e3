//! Per-module save and restore of player input and solver output.

mod workspace;

pub use workspace::{ModuleWorkspace, Progress, RestoredModule};
