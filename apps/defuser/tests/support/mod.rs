#![allow(dead_code)]

pub mod fake_api;
pub mod fixtures;
pub mod stub_server;

pub use fake_api::FakeRoundApi;
pub use fixtures::{seed, store_with, wires_answer, wires_state, Seeded};
