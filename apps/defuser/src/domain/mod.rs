//! Entity model for a play session: rounds own bombs, bombs own modules.
//!
//! Everything here is a value. Collections hold `Arc`s so that a change
//! rebuilds only the path from the round to the touched entity while
//! untouched siblings keep their allocation.

pub mod bomb;
pub mod module;
pub mod payload;
pub mod round;

pub use bomb::{Batteries, Bomb, BombConfig, BombPatch, BombStatus, PortPlate, PortType};
pub use module::{Module, ModuleType, ModuleUpdate, StageKind};
pub use payload::{ModuleSolution, ModuleState, TypedPayload};
pub use round::{Round, RoundStatus};

pub type RoundId = i64;
pub type BombId = i64;
pub type ModuleId = i64;
