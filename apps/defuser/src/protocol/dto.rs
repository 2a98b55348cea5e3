//! DTOs for the round/bomb/module endpoints.
//!
//! Module payloads arrive as untyped JSON and are decoded here by module type.
//! A payload that does not fit its type is dropped with a warning so one odd
//! module cannot make a whole round unreadable.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use time::OffsetDateTime;
use tracing::warn;

use crate::domain::{
    Batteries, Bomb, BombId, BombStatus, Module, ModuleId, ModuleSolution, ModuleState,
    ModuleType, PortPlate, Round, RoundId, RoundStatus,
};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDto {
    pub id: RoundId,
    pub status: RoundStatus,
    #[serde(default)]
    pub bombs: Vec<BombDto>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
    #[serde(default)]
    pub round_state: JsonValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BombDto {
    pub id: BombId,
    pub serial_number: String,
    #[serde(default)]
    pub batteries: Batteries,
    #[serde(default)]
    pub indicators: BTreeMap<String, bool>,
    #[serde(default)]
    pub port_plates: Vec<PortPlate>,
    pub status: BombStatus,
    #[serde(default)]
    pub strikes: u32,
    #[serde(default)]
    pub modules: Vec<ModuleDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDto {
    pub id: ModuleId,
    #[serde(rename = "type")]
    pub module_type: ModuleType,
    #[serde(default)]
    pub solved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<JsonValue>,
}

/// Body for adding modules of one type to a bomb.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddModulesRequest {
    #[serde(rename = "type")]
    pub module_type: ModuleType,
    pub count: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    pub input: JsonValue,
}

impl SolveRequest {
    pub fn new(input: &ModuleState) -> Result<Self, AppError> {
        Ok(Self {
            input: input.to_json()?,
        })
    }
}

/// Solver answer; `solved` is only sent by multi-stage types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveReply {
    pub output: JsonValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solved: Option<bool>,
}

impl SolveReply {
    pub fn decode(self, module_type: ModuleType) -> Result<(ModuleSolution, Option<bool>), AppError> {
        let solution = ModuleSolution::from_json(module_type, self.output).map_err(|e| {
            AppError::decode(format!("{module_type} solver output: {e}"))
        })?;
        Ok((solution, self.solved))
    }
}

impl From<RoundDto> for Round {
    fn from(dto: RoundDto) -> Self {
        Round {
            id: dto.id,
            status: dto.status,
            bombs: dto
                .bombs
                .into_iter()
                .map(|b| Arc::new(Bomb::from(b)))
                .collect(),
            start_time: dto.start_time,
            round_state: dto.round_state,
        }
    }
}

impl From<BombDto> for Bomb {
    fn from(dto: BombDto) -> Self {
        Bomb {
            id: dto.id,
            serial_number: dto.serial_number,
            batteries: dto.batteries,
            indicators: dto.indicators,
            port_plates: dto.port_plates,
            status: dto.status,
            strikes: dto.strikes,
            modules: dto
                .modules
                .into_iter()
                .map(|m| Arc::new(Module::from(m)))
                .collect(),
        }
    }
}

impl From<ModuleDto> for Module {
    fn from(dto: ModuleDto) -> Self {
        let state = dto.state.and_then(|value| {
            decode_payload(dto.id, "state", value, |v| {
                ModuleState::from_json(dto.module_type, v)
            })
        });
        let solution = dto.solution.and_then(|value| {
            decode_payload(dto.id, "solution", value, |v| {
                ModuleSolution::from_json(dto.module_type, v)
            })
        });
        Module {
            id: dto.id,
            module_type: dto.module_type,
            solved: dto.solved,
            state,
            solution,
        }
    }
}

fn decode_payload<T>(
    module_id: ModuleId,
    field: &'static str,
    value: JsonValue,
    decode: impl FnOnce(JsonValue) -> Result<T, serde_json::Error>,
) -> Option<T> {
    if value.is_null() {
        return None;
    }
    match decode(value) {
        Ok(payload) => Some(payload),
        Err(err) => {
            warn!(module_id, field, error = %err, "Dropping undecodable module payload");
            None
        }
    }
}
