#![cfg(test)]

//! Logging for the crate's unit tests; same knobs as the integration suites.

pub fn init() {
    defuser_test_support::logging::init();
}
