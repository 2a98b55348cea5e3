//! Error handling for the defuser session core.

pub mod domain;
pub mod error_code;

pub use domain::Entity;
pub use error_code::ErrorCode;
