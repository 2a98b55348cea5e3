//! Remote round/solve service seam.

pub mod http;
pub mod trait_def;

pub use http::HttpRoundApi;
pub use trait_def::{RoundApi, SolveAnswer};
