use std::sync::Arc;

use crate::domain::{Bomb, BombId, Module, ModuleId, ModuleType, Round, RoundId};

/// Which module is in focus. Resolved against the held round on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    pub bomb_id: BombId,
    pub module_id: ModuleId,
    pub module_type: ModuleType,
}

/// Immutable view of the session published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub round: Option<Arc<Round>>,
    /// History list; independent of `round`.
    pub rounds: Vec<Arc<Round>>,
    pub selected_bomb: Option<BombId>,
    pub selection: Option<Selection>,
    pub manual_url: Option<String>,
    /// Display counter for command numbering, 1..=99.
    pub module_number: u8,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            round: None,
            rounds: Vec::new(),
            selected_bomb: None,
            selection: None,
            manual_url: None,
            module_number: 1,
            loading: false,
            error: None,
        }
    }
}

impl SessionSnapshot {
    pub fn round_id(&self) -> Option<RoundId> {
        self.round.as_ref().map(|r| r.id)
    }

    pub fn bomb(&self, bomb_id: BombId) -> Option<&Arc<Bomb>> {
        self.round.as_ref()?.bomb(bomb_id)
    }

    pub fn current_bomb(&self) -> Option<&Arc<Bomb>> {
        self.bomb(self.selected_bomb?)
    }

    pub fn resolve_module(
        &self,
        bomb_id: BombId,
        module_id: ModuleId,
    ) -> Option<(&Arc<Bomb>, &Arc<Module>)> {
        self.round.as_ref()?.resolve_module(bomb_id, module_id)
    }

    /// The focused module and its bomb, read from the canonical tree.
    pub fn current_module(&self) -> Option<(&Arc<Bomb>, &Arc<Module>)> {
        let selection = self.selection?;
        self.resolve_module(selection.bomb_id, selection.module_id)
    }
}
