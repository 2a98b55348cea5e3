#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod navigation;
pub mod persistence;
pub mod protocol;
pub mod store;
pub mod telemetry;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use api::{HttpRoundApi, RoundApi, SolveAnswer};
pub use config::ApiConfig;
pub use error::AppError;
pub use errors::{Entity, ErrorCode};
pub use navigation::{enter_module, leave_module, ModuleContext};
pub use persistence::{ModuleWorkspace, Progress, RestoredModule};
pub use store::{Selection, SessionSnapshot, SessionStore, SolveOutcome};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
