//! Wire shapes exchanged with the solving service.

pub mod dto;

pub use dto::{AddModulesRequest, BombDto, ModuleDto, RoundDto, SolveReply, SolveRequest};
