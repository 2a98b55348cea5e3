//! Shared helpers for the defuser test suites.

pub mod logging;
