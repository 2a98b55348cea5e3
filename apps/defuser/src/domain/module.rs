use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ModuleId, ModuleSolution, ModuleState};
use crate::error::AppError;
use crate::errors::ErrorCode;

/// How a module type reaches completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// One accepted solver response completes the module.
    Single,
    /// Completes only when the server flags the final stage as solved.
    Multi,
    /// Recurring; never completes.
    Needy,
}

/// Closed set of puzzle kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleType {
    Wires,
    Button,
    Keypads,
    SimonSays,
    WhosOnFirst,
    Memory,
    MorseCode,
    ComplicatedWires,
    WireSequences,
    Mazes,
    Passwords,
    Knobs,
}

impl ModuleType {
    pub const ALL: [ModuleType; 12] = [
        ModuleType::Wires,
        ModuleType::Button,
        ModuleType::Keypads,
        ModuleType::SimonSays,
        ModuleType::WhosOnFirst,
        ModuleType::Memory,
        ModuleType::MorseCode,
        ModuleType::ComplicatedWires,
        ModuleType::WireSequences,
        ModuleType::Mazes,
        ModuleType::Passwords,
        ModuleType::Knobs,
    ];

    pub const fn stage_kind(&self) -> StageKind {
        match self {
            ModuleType::Wires
            | ModuleType::Keypads
            | ModuleType::MorseCode
            | ModuleType::ComplicatedWires
            | ModuleType::Mazes
            | ModuleType::Passwords => StageKind::Single,
            ModuleType::Button
            | ModuleType::SimonSays
            | ModuleType::WhosOnFirst
            | ModuleType::Memory
            | ModuleType::WireSequences => StageKind::Multi,
            ModuleType::Knobs => StageKind::Needy,
        }
    }

    /// Human-readable name, also the page name in the reference manual.
    pub const fn display_name(&self) -> &'static str {
        match self {
            ModuleType::Wires => "Wires",
            ModuleType::Button => "The Button",
            ModuleType::Keypads => "Keypad",
            ModuleType::SimonSays => "Simon Says",
            ModuleType::WhosOnFirst => "Who’s on First",
            ModuleType::Memory => "Memory",
            ModuleType::MorseCode => "Morse Code",
            ModuleType::ComplicatedWires => "Complicated Wires",
            ModuleType::WireSequences => "Wire Sequence",
            ModuleType::Mazes => "Maze",
            ModuleType::Passwords => "Password",
            ModuleType::Knobs => "Knob",
        }
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One sub-puzzle on a bomb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub id: ModuleId,
    pub module_type: ModuleType,
    pub solved: bool,
    /// Last in-progress input.
    pub state: Option<ModuleState>,
    /// Last accepted or partial solver output.
    pub solution: Option<ModuleSolution>,
}

impl Module {
    pub fn new(id: ModuleId, module_type: ModuleType) -> Self {
        Self {
            id,
            module_type,
            solved: false,
            state: None,
            solution: None,
        }
    }

    /// Apply a local write. `Ok(None)` means the module is unchanged.
    ///
    /// Payloads must match the module type. A solved module accepts no
    /// payload writes and never becomes unsolved.
    pub fn apply(&self, update: &ModuleUpdate) -> Result<Option<Module>, AppError> {
        if let Some(state) = &update.state {
            self.check_type(state.module_type())?;
        }
        if let Some(solution) = &update.solution {
            self.check_type(solution.module_type())?;
        }

        if self.solved {
            if update.state.is_some() || update.solution.is_some() {
                return Err(AppError::invalid(
                    ErrorCode::ModuleAlreadySolved,
                    format!("module {} is solved and read-only", self.id),
                ));
            }
            return Ok(None);
        }

        if update.is_empty() {
            return Ok(None);
        }

        let mut next = self.clone();
        if let Some(state) = &update.state {
            next.state = Some(state.clone());
        }
        if let Some(solution) = &update.solution {
            next.solution = Some(solution.clone());
        }
        next.solved = update.solved;

        Ok((next != *self).then_some(next))
    }

    fn check_type(&self, payload_type: ModuleType) -> Result<(), AppError> {
        if payload_type != self.module_type {
            return Err(AppError::invalid(
                ErrorCode::ModuleTypeMismatch,
                format!(
                    "{payload_type} payload cannot be stored on {} module {}",
                    self.module_type, self.id
                ),
            ));
        }
        Ok(())
    }
}

/// A single local write to a module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleUpdate {
    pub state: Option<ModuleState>,
    pub solution: Option<ModuleSolution>,
    pub solved: bool,
}

impl ModuleUpdate {
    pub fn state(state: impl Into<ModuleState>) -> Self {
        Self {
            state: Some(state.into()),
            ..Self::default()
        }
    }

    pub fn solved() -> Self {
        Self {
            solved: true,
            ..Self::default()
        }
    }

    pub fn with_solution(mut self, solution: impl Into<ModuleSolution>) -> Self {
        self.solution = Some(solution.into());
        self
    }

    pub fn with_solved(mut self, solved: bool) -> Self {
        self.solved = solved;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.solution.is_none() && !self.solved
    }
}
