//! Remote service trait definition.

use async_trait::async_trait;

use crate::domain::{
    Bomb, BombConfig, BombId, BombPatch, Module, ModuleId, ModuleSolution, ModuleState,
    ModuleType, Round, RoundId,
};
use crate::error::AppError;

/// Decoded solver answer.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveAnswer {
    pub output: ModuleSolution,
    /// Completion flag sent by multi-stage module types.
    pub solved: Option<bool>,
}

/// CRUD and solve calls against the solving service.
///
/// Every call may fail with `AppError::Transport`, `AppError::Server` or
/// `AppError::Decode`. Implementations do not retry or deduplicate.
#[async_trait]
pub trait RoundApi: Send + Sync {
    async fn create_round(&self) -> Result<Round, AppError>;

    async fn fetch_round(&self, round_id: RoundId) -> Result<Round, AppError>;

    async fn list_rounds(&self) -> Result<Vec<Round>, AppError>;

    async fn delete_round(&self, round_id: RoundId) -> Result<(), AppError>;

    /// Move the round to `ACTIVE`.
    async fn start_round(&self, round_id: RoundId) -> Result<Round, AppError>;

    async fn create_bomb(&self, round_id: RoundId, config: &BombConfig) -> Result<Bomb, AppError>;

    async fn configure_bomb(
        &self,
        round_id: RoundId,
        bomb_id: BombId,
        patch: &BombPatch,
    ) -> Result<Bomb, AppError>;

    async fn add_modules(
        &self,
        round_id: RoundId,
        bomb_id: BombId,
        module_type: ModuleType,
        count: u8,
    ) -> Result<Vec<Module>, AppError>;

    /// Record a strike; the returned bomb may have exploded.
    async fn add_strike(&self, round_id: RoundId, bomb_id: BombId) -> Result<Bomb, AppError>;

    async fn solve(
        &self,
        round_id: RoundId,
        bomb_id: BombId,
        module_id: ModuleId,
        input: &ModuleState,
    ) -> Result<SolveAnswer, AppError>;
}
