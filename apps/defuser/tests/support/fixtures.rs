// Shared builders for store-level tests.

use std::sync::Arc;

use defuser::domain::payload::{WireColor, WiresSolution, WiresState};
use defuser::domain::{Batteries, BombConfig, BombId, ModuleId, ModuleType, RoundId};
use defuser::navigation::ManualLinks;
use defuser::{AppError, SessionStore, SolveAnswer};

use super::fake_api::FakeRoundApi;

pub const MANUAL_BASE: &str = "https://manual.test/HTML";

pub fn store_with(api: &Arc<FakeRoundApi>) -> Arc<SessionStore> {
    Arc::new(SessionStore::new(api.clone(), ManualLinks::new(MANUAL_BASE)))
}

pub fn bomb_config(serial: &str) -> BombConfig {
    BombConfig {
        serial_number: serial.to_string(),
        batteries: Batteries { aa: 2, d: 0 },
        ..BombConfig::default()
    }
}

pub fn wires_state() -> WiresState {
    WiresState {
        wires: vec![WireColor::Red, WireColor::Blue, WireColor::Blue],
    }
}

pub fn wires_answer(cut_position: u8, solved: Option<bool>) -> SolveAnswer {
    SolveAnswer {
        output: WiresSolution { cut_position }.into(),
        solved,
    }
}

/// A held round with one bomb carrying `count` modules of `module_type`.
pub struct Seeded {
    pub round_id: RoundId,
    pub bomb_id: BombId,
    pub module_ids: Vec<ModuleId>,
}

pub async fn seed(
    store: &SessionStore,
    serial: &str,
    module_type: ModuleType,
    count: u8,
) -> Result<Seeded, AppError> {
    let round = store.create_round().await?;
    let bomb = store.add_bomb(bomb_config(serial)).await?;
    let modules = store.add_modules(bomb.id, module_type, count).await?;
    Ok(Seeded {
        round_id: round.id,
        bomb_id: bomb.id,
        module_ids: modules.iter().map(|m| m.id).collect(),
    })
}
